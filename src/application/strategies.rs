use std::sync::Arc;

use async_trait::async_trait;

use crate::application::{AppResult, Cooldown, CooldownStrategy, EventPublisher};
use crate::domain::{CooldownEvent, CooldownEventKind, SubjectKey};

/// Strategy from a plain function or closure.
pub struct FnStrategy<F>(F);

pub fn strategy_fn<F>(f: F) -> FnStrategy<F>
where
    F: Fn(SubjectKey, &Cooldown) -> AppResult<()> + Send + Sync,
{
    FnStrategy(f)
}

#[async_trait]
impl<F> CooldownStrategy for FnStrategy<F>
where
    F: Fn(SubjectKey, &Cooldown) -> AppResult<()> + Send + Sync,
{
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        (self.0)(subject, cooldown)
    }
}

/// Broadcasts a [`CooldownEvent`] of a fixed kind to async consumers.
pub struct BroadcastStrategy {
    publisher: Arc<dyn EventPublisher>,
    kind: CooldownEventKind,
}

impl BroadcastStrategy {
    pub fn new(publisher: Arc<dyn EventPublisher>, kind: CooldownEventKind) -> Self {
        Self { publisher, kind }
    }

    pub fn rejections(publisher: Arc<dyn EventPublisher>) -> Self {
        Self::new(publisher, CooldownEventKind::Rejected)
    }

    pub fn expiries(publisher: Arc<dyn EventPublisher>) -> Self {
        Self::new(publisher, CooldownEventKind::Expired)
    }
}

#[async_trait]
impl CooldownStrategy for BroadcastStrategy {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        let event = CooldownEvent {
            cooldown: cooldown.name().to_string(),
            subject,
            kind: self.kind,
            time_left: cooldown.time_left(&subject),
        };
        self.publisher.publish(&event).await
    }
}

/// Runs every strategy in order. All of them run even if one fails; the last
/// error is returned.
pub struct Chain {
    strategies: Vec<Arc<dyn CooldownStrategy>>,
}

impl Chain {
    pub fn new(strategies: Vec<Arc<dyn CooldownStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[async_trait]
impl CooldownStrategy for Chain {
    async fn accept(&self, subject: SubjectKey, cooldown: &Cooldown) -> AppResult<()> {
        let mut last_err = None;
        for strategy in &self.strategies {
            if let Err(e) = strategy.accept(subject, cooldown).await {
                last_err = Some(e);
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
