use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::Notice;

pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(&self, notice: &Notice) -> AppResult<()> {
        // best effort: one failing channel does not stop the others
        let mut last_err = None;

        for n in &self.notifiers {
            if let Err(e) = n.notify(notice).await {
                tracing::warn!(subject = %notice.subject.key, "notifier failed: {e}");
                last_err = Some(e);
            }
        }

        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
