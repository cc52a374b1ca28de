use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::application::{TickHandle, TickSource, TickTask};

/// [`TickSource`] running on the current tokio runtime.
///
/// Each registration gets one task that awaits every run before waiting for
/// the next tick, so runs never overlap. Late ticks are skipped, not bunched.
/// A run that panics is logged and the next tick runs as usual.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

impl TokioTicker {
    pub fn new() -> Self {
        Self
    }
}

impl TickSource for TokioTicker {
    fn schedule_every(&self, period: Duration, task: Arc<dyn TickTask>) -> TickHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // a dropped handle closes the channel; keep ticking without it
            let mut listening = true;

            loop {
                tokio::select! {
                    biased;

                    changed = shutdown_rx.changed(), if listening => {
                        match changed {
                            Ok(()) if *shutdown_rx.borrow() => {
                                tracing::info!("tick task shutting down");
                                break;
                            }
                            Ok(()) => {}
                            Err(_) => listening = false,
                        }
                    }
                    _ = ticker.tick() => {
                        // a panicking run must not end the loop
                        let task = task.clone();
                        if let Err(e) = tokio::spawn(async move { task.run().await }).await {
                            if e.is_panic() {
                                tracing::error!("tick task panicked: {e}");
                            }
                        }
                    }
                }
            }
        });

        TickHandle::new(move || {
            let _ = shutdown_tx.send(true);
        })
    }
}
