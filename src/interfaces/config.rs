use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::application::{
    AppError, AppResult, BroadcastStrategy, Chain, Cooldown, CooldownStrategy, EngineConfig,
    EventPublisher, Notifier, OnlineGuard, RefreshEngine, SubjectDirectory,
};
use crate::infrastructure::message_action::MessageAction;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    pub cooldowns: Vec<CooldownCfg>,
}

#[derive(Debug, Deserialize)]
pub struct CooldownCfg {
    pub name: String,
    pub default_seconds: Option<u64>,
    /// Sent to a subject that tries again too early.
    #[serde(default)]
    pub reject_messages: Vec<String>,
    /// Sent to a subject once its cooldown is over.
    #[serde(default)]
    pub expiry_messages: Vec<String>,
}

fn default_tick_interval_ms() -> u64 {
    EngineConfig::default().tick_interval().as_millis() as u64
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::Config(msg.into())
}

impl Config {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let raw = expand_env(raw);
        let cfg: Config = serde_yaml::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms must be positive"));
        }

        let mut names = HashSet::new();
        for c in &self.cooldowns {
            if c.name.trim().is_empty() {
                return Err(invalid("cooldown name must not be empty"));
            }
            if !names.insert(c.name.as_str()) {
                return Err(invalid(format!("duplicate cooldown name: {}", c.name)));
            }
            if c.default_seconds == Some(0) {
                return Err(invalid(format!(
                    "cooldown {}: default_seconds must be positive",
                    c.name
                )));
            }
        }
        Ok(())
    }

    pub fn engine_config(&self) -> AppResult<EngineConfig> {
        Ok(EngineConfig::new(Duration::from_millis(self.tick_interval_ms))?)
    }

    /// Builds every configured cooldown on `engine`.
    ///
    /// Messages go to subjects still found in `directory`; when a publisher is
    /// given, rejections and expiries are also published as events.
    pub fn build_cooldowns<D>(
        &self,
        engine: &RefreshEngine,
        directory: &D,
        notifier: Arc<dyn Notifier>,
        publisher: Option<Arc<dyn EventPublisher>>,
    ) -> HashMap<String, Cooldown>
    where
        D: SubjectDirectory + Clone + 'static,
    {
        let mut out = HashMap::new();

        for c in &self.cooldowns {
            let mut builder = engine.builder().named(c.name.clone());
            if let Some(secs) = c.default_seconds {
                builder = builder.default_duration(Duration::from_secs(secs));
            }

            let rejection = strategies_for(
                &c.reject_messages,
                directory,
                &notifier,
                publisher.clone().map(BroadcastStrategy::rejections),
            );
            if !rejection.is_empty() {
                builder = builder.rejects_with(rejection);
            }

            let expiry = strategies_for(
                &c.expiry_messages,
                directory,
                &notifier,
                publisher.clone().map(BroadcastStrategy::expiries),
            );
            if !expiry.is_empty() {
                builder = builder.when_over(expiry);
            }

            out.insert(c.name.clone(), builder.build());
        }
        out
    }
}

fn strategies_for<D>(
    messages: &[String],
    directory: &D,
    notifier: &Arc<dyn Notifier>,
    publish: Option<BroadcastStrategy>,
) -> Chain
where
    D: SubjectDirectory + Clone + 'static,
{
    let mut strategies: Vec<Arc<dyn CooldownStrategy>> = Vec::new();
    if !messages.is_empty() {
        strategies.push(Arc::new(OnlineGuard::new(
            directory.clone(),
            MessageAction::new(messages.to_vec(), notifier.clone()),
        )));
    }
    if let Some(publish) = publish {
        strategies.push(Arc::new(publish));
    }
    Chain::new(strategies)
}

/// very small ${VAR} expansion to keep config simple
fn expand_env(s: &str) -> String {
    let mut out = s.to_string();
    for (k, v) in std::env::vars() {
        out = out.replace(&format!("${{{}}}", k), &v);
    }
    out
}
