use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::Notice;

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notice: &Notice) -> AppResult<()> {
        println!(
            "[{}] to {}: {}",
            notice.cooldown, notice.subject.name, notice.text
        );
        Ok(())
    }
}
