use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::{AppResult, EventPublisher};
use crate::domain::CooldownEvent;

/// In-process fan-out of [`CooldownEvent`]s.
///
/// Receivers that fall behind by more than the buffer lag and skip the
/// oldest events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CooldownEvent>,
}

impl EventBus {
    pub fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CooldownEvent> {
        self.tx.subscribe()
    }

    /// Sends `event` to every current receiver and returns how many there were.
    pub fn publish(&self, event: CooldownEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(
                    cooldown = %event.cooldown,
                    subject = %event.subject,
                    "no event receivers"
                );
                0
            }
        }
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, event: &CooldownEvent) -> AppResult<()> {
        EventBus::publish(self, event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CooldownEventKind, SubjectKey};

    fn expired(cooldown: &str) -> CooldownEvent {
        CooldownEvent {
            cooldown: cooldown.into(),
            subject: SubjectKey::random(),
            kind: CooldownEventKind::Expired,
            time_left: None,
        }
    }

    #[test]
    fn publish_counts_receivers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(expired("greet")), 0);

        let mut first = bus.subscribe();
        let _second = bus.subscribe();
        assert_eq!(bus.publish(expired("trade")), 2);
        assert_eq!(first.try_recv().unwrap().cooldown, "trade");
    }
}
