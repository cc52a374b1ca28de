//! Shared refresh engine.
//!
//! One periodic tick serves every registered cooldown. Each tick diffs the
//! cooldown's active set against the set seen on the previous tick, and runs
//! the expiry strategy for every subject that dropped out.

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;

use crate::application::{
    ConfigurationError, Cooldown, CooldownBuilder, CooldownStrategy, TickHandle, TickSource,
    TickTask,
};
use crate::domain::{SubjectKey, difference};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    tick_interval: Duration,
}

impl EngineConfig {
    /// `tick_interval` is shared by all registered cooldowns and must be non-zero.
    pub fn new(tick_interval: Duration) -> Result<Self, ConfigurationError> {
        if tick_interval.is_zero() {
            return Err(ConfigurationError::ZeroTickInterval);
        }
        Ok(Self { tick_interval })
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// What one tick observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub cooldowns: usize,
    pub newly_active: usize,
    pub released: usize,
    pub failures: usize,
}

#[derive(Clone, Default)]
pub struct RefreshEngine {
    inner: Arc<EngineInner>,
}

#[derive(Default)]
struct EngineInner {
    config: EngineConfig,
    registrations: Mutex<Vec<Arc<Registration>>>,
}

struct Registration {
    cooldown: Cooldown,
    strategy: Arc<dyn CooldownStrategy>,
    /// Subjects seen active on the previous tick.
    last_known: Mutex<HashSet<SubjectKey>>,
}

impl Registration {
    /// Diffs one snapshot against the last known set and returns
    /// `(newly active count, released subjects)`. Released subjects are
    /// already forgotten when this returns.
    ///
    /// The snapshot is taken under the registration lock so overlapping
    /// ticks observe in order.
    fn observe(&self) -> (usize, Vec<SubjectKey>) {
        let mut last_known = self
            .last_known
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current: HashSet<SubjectKey> = self.cooldown.snapshot().into_keys().collect();

        let newly_active = difference(&current, &*last_known);
        last_known.extend(newly_active.iter().copied());

        let released = difference(last_known.iter(), &current);
        for subject in &released {
            last_known.remove(subject);
        }

        (newly_active.len(), released)
    }
}

impl RefreshEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                registrations: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.inner.config
    }

    /// Builder for a cooldown tracked by this engine.
    pub fn builder(&self) -> CooldownBuilder {
        CooldownBuilder::new(self.clone())
    }

    /// Starts tracking `cooldown`; `strategy` runs once per subject whose
    /// cooldown is observed to be over. Registering the same cooldown twice
    /// is ignored.
    pub fn register(&self, cooldown: &Cooldown, strategy: Arc<dyn CooldownStrategy>) {
        let mut registrations = self.registrations();
        if registrations
            .iter()
            .any(|registration| registration.cooldown.same_as(cooldown))
        {
            tracing::warn!(cooldown = %cooldown.name(), "cooldown already registered");
            return;
        }

        registrations.push(Arc::new(Registration {
            cooldown: cooldown.clone(),
            strategy,
            last_known: Mutex::new(HashSet::new()),
        }));
        tracing::info!(
            cooldown = %cooldown.name(),
            registered = registrations.len(),
            "cooldown registered for expiry notification"
        );
    }

    pub fn registered(&self) -> usize {
        self.registrations().len()
    }

    /// One diff-and-notify pass over every registered cooldown.
    ///
    /// A failing or panicking strategy is logged and counted; the pass
    /// continues with the remaining subjects and cooldowns.
    pub async fn tick(&self) -> TickReport {
        let registrations = self.registrations().clone();
        let mut report = TickReport::default();

        for registration in registrations {
            report.cooldowns += 1;
            let (newly_active, released) = registration.observe();
            report.newly_active += newly_active;
            report.released += released.len();

            for subject in released {
                let outcome = AssertUnwindSafe(
                    registration
                        .strategy
                        .accept(subject, &registration.cooldown),
                )
                .catch_unwind()
                .await;

                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        report.failures += 1;
                        tracing::warn!(
                            cooldown = %registration.cooldown.name(),
                            %subject,
                            "expiry strategy failed: {e}"
                        );
                    }
                    Err(panic) => {
                        report.failures += 1;
                        tracing::error!(
                            cooldown = %registration.cooldown.name(),
                            %subject,
                            "expiry strategy panicked: {}",
                            panic_message(&*panic)
                        );
                    }
                }
            }
        }

        tracing::trace!(
            cooldowns = report.cooldowns,
            newly_active = report.newly_active,
            released = report.released,
            failures = report.failures,
            "tick"
        );
        report
    }

    /// Schedules [`RefreshEngine::tick`] on `source` at the configured interval.
    pub fn start(&self, source: &dyn TickSource) -> TickHandle {
        tracing::info!(
            tick_interval_ms = self.inner.config.tick_interval().as_millis() as u64,
            "refresh engine started"
        );
        source.schedule_every(self.inner.config.tick_interval(), Arc::new(self.clone()))
    }

    fn registrations(&self) -> MutexGuard<'_, Vec<Arc<Registration>>> {
        self.inner
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}

#[async_trait]
impl TickTask for RefreshEngine {
    async fn run(&self) {
        self.tick().await;
    }
}
