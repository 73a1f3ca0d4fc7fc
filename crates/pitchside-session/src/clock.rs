//! Session wall-clock stopwatch.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::events::{ControlEvent, Envelope};

/// Format a second count as `m:ss` with zero-padded seconds.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Repeating one-period ticker running for the lifetime of a session.
///
/// Each tick counts one elapsed second, independent of stage or byte
/// progress. Stopping an already-stopped clock is a no-op.
pub struct ProgressClock {
    handle: JoinHandle<()>,
}

impl ProgressClock {
    /// Spawn the ticker. The first tick fires one full period after start.
    pub fn start(period: Duration, generation: u64, tx: UnboundedSender<Envelope>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The interval's initial tick completes immediately; skip it so a
            // tick always represents one full period of wall time.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx
                    .send(Envelope {
                        generation,
                        event: ControlEvent::ClockTick,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Cancel the ticker. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ProgressClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
