use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::application::{AppResult, ConfigurationError, CooldownStrategy};
use crate::domain::{ExpiryMap, SubjectKey};

/// A period subjects are forced to wait before repeating an action.
///
/// Cloning is cheap and every clone refers to the same state. All operations
/// on one cooldown are serialized by a lock scoped to it; strategies are
/// always invoked after that lock has been released.
///
/// Build one through [`CooldownBuilder`](crate::application::CooldownBuilder).
#[derive(Clone)]
pub struct Cooldown {
    inner: Arc<Shared>,
}

struct Shared {
    name: String,
    state: Mutex<State>,
    rejection: Option<Arc<dyn CooldownStrategy>>,
    expiry: Option<Arc<dyn CooldownStrategy>>,
}

struct State {
    expiries: ExpiryMap,
    default_duration: Option<Duration>,
}

impl Cooldown {
    pub(crate) fn new(
        name: String,
        default_duration: Option<Duration>,
        rejection: Option<Arc<dyn CooldownStrategy>>,
        expiry: Option<Arc<dyn CooldownStrategy>>,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                name,
                state: Mutex::new(State {
                    expiries: ExpiryMap::new(),
                    default_duration,
                }),
                rejection,
                expiry,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Puts `subject` on this cooldown for `duration`, replacing any earlier expiry.
    ///
    /// A zero duration records an entry that is already over.
    pub fn put(&self, subject: SubjectKey, duration: Duration) {
        let now = Instant::now();
        self.state().expiries.put(subject, now, duration);
        tracing::debug!(cooldown = %self.name(), %subject, ?duration, "subject put on cooldown");
    }

    /// Puts `subject` on this cooldown for the default duration.
    pub fn put_default(&self, subject: SubjectKey) -> AppResult<()> {
        let now = Instant::now();
        let duration = {
            let mut state = self.state();
            let duration = state.default_duration.ok_or_else(|| {
                ConfigurationError::NoDefaultDuration {
                    cooldown: self.name().to_string(),
                }
            })?;
            state.expiries.put(subject, now, duration);
            duration
        };
        tracing::debug!(cooldown = %self.name(), %subject, ?duration, "subject put on cooldown");
        Ok(())
    }

    pub fn is_active(&self, subject: &SubjectKey) -> bool {
        self.state().expiries.is_active(subject, Instant::now())
    }

    /// Takes `subject` off this cooldown. Releasing an absent subject is a no-op.
    pub fn release(&self, subject: &SubjectKey) {
        if self.state().expiries.remove(subject) {
            tracing::debug!(cooldown = %self.name(), %subject, "subject released");
        }
    }

    /// Removes every subject. No strategy runs here; a registered expiry
    /// strategy sees the removed subjects as released on the next tick.
    pub fn clear(&self) {
        let removed = self.state().expiries.clear();
        tracing::debug!(cooldown = %self.name(), removed, "cooldown cleared");
    }

    /// Remaining time for `subject`, or `None` if it is not on this cooldown.
    pub fn time_left(&self, subject: &SubjectKey) -> Option<Duration> {
        self.state().expiries.time_left(subject, Instant::now())
    }

    /// Gates an action: `Ok(true)` if `subject` may proceed.
    ///
    /// When the subject is still on cooldown the rejection strategy runs once
    /// and `Ok(false)` is returned. Errors from the strategy are passed back.
    pub async fn test(&self, subject: SubjectKey) -> AppResult<bool> {
        let rejection = self.inner.rejection.as_ref().ok_or_else(|| {
            ConfigurationError::NoRejectionStrategy {
                cooldown: self.name().to_string(),
            }
        })?;

        if !self.is_active(&subject) {
            return Ok(true);
        }

        rejection.accept(subject, self).await?;
        Ok(false)
    }

    /// Active subjects and their expiries.
    ///
    /// This is the one operation that drops stale entries from the store;
    /// every other query only compares against the current time.
    pub fn snapshot(&self) -> HashMap<SubjectKey, Instant> {
        self.state().expiries.sweep(Instant::now())
    }

    /// Number of active subjects. Sweeps like [`Cooldown::snapshot`].
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn default_duration(&self) -> Option<Duration> {
        self.state().default_duration
    }

    pub fn set_default_duration(&self, duration: Option<Duration>) {
        self.state().default_duration = duration;
    }

    pub fn has_rejection_strategy(&self) -> bool {
        self.inner.rejection.is_some()
    }

    pub fn has_expiry_strategy(&self) -> bool {
        self.inner.expiry.is_some()
    }

    /// Whether both handles refer to the same cooldown.
    pub fn same_as(&self, other: &Cooldown) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // No user code runs under this lock, so a poisoned map is still consistent.
    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Cooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cooldown")
            .field("name", &self.inner.name)
            .field("rejection", &self.has_rejection_strategy())
            .field("expiry", &self.has_expiry_strategy())
            .finish_non_exhaustive()
    }
}
