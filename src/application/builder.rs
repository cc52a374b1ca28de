use std::sync::Arc;
use std::time::Duration;

use crate::application::{Cooldown, CooldownStrategy, RefreshEngine};

/// Configures and builds a [`Cooldown`].
///
/// Building never fails. A cooldown with an expiry strategy is registered
/// with the engine before `build` hands it out.
pub struct CooldownBuilder {
    engine: RefreshEngine,
    name: String,
    default_duration: Option<Duration>,
    rejection: Option<Arc<dyn CooldownStrategy>>,
    expiry: Option<Arc<dyn CooldownStrategy>>,
}

impl CooldownBuilder {
    pub fn new(engine: RefreshEngine) -> Self {
        Self {
            engine,
            name: "cooldown".to_string(),
            default_duration: None,
            rejection: None,
            expiry: None,
        }
    }

    /// Name used in logs and notices.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = Some(duration);
        self
    }

    /// What happens when a subject still on cooldown is tested.
    pub fn rejects_with(mut self, strategy: impl CooldownStrategy + 'static) -> Self {
        self.rejection = Some(Arc::new(strategy));
        self
    }

    /// What happens once a subject's cooldown is over.
    pub fn when_over(mut self, strategy: impl CooldownStrategy + 'static) -> Self {
        self.expiry = Some(Arc::new(strategy));
        self
    }

    pub fn build(self) -> Cooldown {
        let cooldown = Cooldown::new(
            self.name,
            self.default_duration,
            self.rejection,
            self.expiry.clone(),
        );

        if let Some(expiry) = self.expiry {
            self.engine.register(&cooldown, expiry);
        }

        cooldown
    }
}
