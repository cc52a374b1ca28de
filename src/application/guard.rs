use async_trait::async_trait;

use crate::application::{AppResult, Cooldown, CooldownStrategy, SubjectAction, SubjectDirectory};
use crate::domain::SubjectKey;

/// Runs `action` only if the subject can still be found in `directory`.
///
/// A subject that went away in the meantime is skipped without error.
pub struct OnlineGuard<D, A> {
    directory: D,
    action: A,
}

impl<D, A> OnlineGuard<D, A> {
    pub fn new(directory: D, action: A) -> Self {
        Self { directory, action }
    }
}

#[async_trait]
impl<D, A> CooldownStrategy for OnlineGuard<D, A>
where
    D: SubjectDirectory,
    A: SubjectAction,
{
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        let Some(live) = self.directory.find(&subject) else {
            tracing::debug!(cooldown = %cooldown.name(), %subject, "subject offline, skipping");
            return Ok(());
        };
        self.action.run(&live, cooldown).await
    }
}
