use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::Cooldown;
use crate::domain::{CooldownEvent, Notice, Subject, SubjectKey};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("strategy error: {0}")]
    Strategy(String),
    #[error("notifier error: {0}")]
    Notifier(String),
    #[error("invalid config: {0}")]
    Config(String),
}

/// A collaborator an operation needs was never supplied.
///
/// These are programming errors: they surface at the first call that needs
/// the missing piece.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("cooldown `{cooldown}` has no default duration")]
    NoDefaultDuration { cooldown: String },
    #[error("cooldown `{cooldown}` has no rejection strategy")]
    NoRejectionStrategy { cooldown: String },
    #[error("no subject key could be resolved for {subject}")]
    UnresolvedSubject { subject: String },
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}

pub type AppResult<T> = Result<T, AppError>;

/// Reacts to a subject on a cooldown: rejection when a blocked subject is
/// tested, expiry once its cooldown is observed to be over.
#[async_trait]
pub trait CooldownStrategy: Send + Sync {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()>;
}

#[async_trait]
impl<S: CooldownStrategy + ?Sized> CooldownStrategy for Arc<S> {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        (**self).accept(subject, cooldown).await
    }
}

/// Maps a platform object to its stable key. Must return the same key for the same subject.
pub trait SubjectResolver<P: ?Sized>: Send + Sync {
    fn resolve(&self, subject: &P) -> Option<SubjectKey>;
}

impl<P: ?Sized, F> SubjectResolver<P> for F
where
    F: Fn(&P) -> Option<SubjectKey> + Send + Sync,
{
    fn resolve(&self, subject: &P) -> Option<SubjectKey> {
        self(subject)
    }
}

/// Finds the live subject behind a key (e.g. an online user), if any.
pub trait SubjectDirectory: Send + Sync {
    fn find(&self, key: &SubjectKey) -> Option<Subject>;
}

/// Work to do against a subject that is known to be live.
#[async_trait]
pub trait SubjectAction: Send + Sync {
    async fn run(&self, subject: &Subject, cooldown: &Cooldown) -> AppResult<()>;
}

/// Deliver notices.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> AppResult<()>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &CooldownEvent) -> AppResult<()>;
}

/// Work driven by a [`TickSource`].
#[async_trait]
pub trait TickTask: Send + Sync {
    async fn run(&self);
}

/// Host capability to run a task at a fixed, non-zero period.
///
/// Runs for the same registration must never overlap.
pub trait TickSource {
    fn schedule_every(&self, period: Duration, task: Arc<dyn TickTask>) -> TickHandle;
}

/// Stops a scheduled task. Dropping the handle leaves the task running.
pub struct TickHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// Handle for a source that cannot be stopped.
    pub fn detached() -> Self {
        Self { stop: None }
    }

    pub fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle")
            .field("stoppable", &self.stop.is_some())
            .finish()
    }
}
