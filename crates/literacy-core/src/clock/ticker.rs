//! Async tick source backed by `tokio::time::interval`.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::TickToken;

/// A spawned task that sends `token` once per `period`.
///
/// The task is aborted when the `Ticker` is dropped. Ticks that were already
/// queued keep their (now stale) token and are rejected by the clock.
#[derive(Debug)]
pub struct Ticker {
    token: TickToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Must be called from within a tokio runtime.
    pub fn spawn(token: TickToken, period: Duration, tx: UnboundedSender<TickToken>) -> Self {
        let handle = tokio::spawn(async move {
            // First tick one full period after arming, not immediately.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(token).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(generation = token.generation(), ?period, "ticker spawned");
        Self { token, handle }
    }

    pub fn token(&self) -> TickToken {
        self.token
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(generation = self.token.generation(), "ticker aborted");
    }
}
