use async_trait::async_trait;
use serde::Serialize;

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::{Notice, SubjectKey};

/// Posts each notice as JSON to a webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook: String,
}

impl WebhookNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook,
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    cooldown: &'a str,
    subject: SubjectKey,
    name: &'a str,
    text: &'a str,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notice: &Notice) -> AppResult<()> {
        let payload = WebhookPayload {
            cooldown: &notice.cooldown,
            subject: notice.subject.key,
            name: &notice.subject.name,
            text: &notice.text,
        };

        self.client
            .post(&self.webhook)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notifier(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Notifier(e.to_string()))?;

        Ok(())
    }
}
