use std::time::Duration;

use crate::application::{AppResult, Cooldown};
use crate::domain::SubjectKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Allowed,
    Rejected { time_left: Option<Duration> },
}

/// Gate an action on a cooldown: a subject that passes `test` is put on the
/// cooldown for its default duration.
pub struct AttemptUseCase<'a> {
    pub cooldown: &'a Cooldown,
}

impl<'a> AttemptUseCase<'a> {
    pub async fn execute(&self, subject: SubjectKey) -> AppResult<Attempt> {
        if !self.cooldown.test(subject).await? {
            return Ok(Attempt::Rejected {
                time_left: self.cooldown.time_left(&subject),
            });
        }

        self.cooldown.put_default(subject)?;
        Ok(Attempt::Allowed)
    }
}
