use std::sync::Arc;

use async_trait::async_trait;

use crate::application::{AppResult, Cooldown, Notifier, SubjectAction};
use crate::domain::{DurationText, Notice, Subject};

pub const PLAYER_PLACEHOLDER: &str = "%player%";
pub const TIME_PLACEHOLDER: &str = "%time%";

/// Sends templated messages to a live subject.
///
/// Placeholders: `%player%` is the subject's name, `%time%` the remaining
/// time on the cooldown (`0 seconds` once it is over).
pub struct MessageAction {
    templates: Vec<String>,
    notifier: Arc<dyn Notifier>,
}

impl MessageAction {
    pub fn new(templates: Vec<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            templates,
            notifier,
        }
    }

    pub fn render(&self, subject: &Subject, cooldown: &Cooldown) -> Vec<String> {
        let time = DurationText(cooldown.time_left(&subject.key).unwrap_or_default()).to_string();
        self.templates
            .iter()
            .map(|template| {
                template
                    .replace(PLAYER_PLACEHOLDER, &subject.name)
                    .replace(TIME_PLACEHOLDER, &time)
            })
            .collect()
    }
}

#[async_trait]
impl SubjectAction for MessageAction {
    async fn run(&self, subject: &Subject, cooldown: &Cooldown) -> AppResult<()> {
        for text in self.render(subject, cooldown) {
            let notice = Notice {
                subject: subject.clone(),
                cooldown: cooldown.name().to_string(),
                text,
            };
            self.notifier.notify(&notice).await?;
        }
        Ok(())
    }
}
