//! Synthetic stage progress animator.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::{ControlEvent, Envelope};

/// Animator timing and increment configuration.
#[derive(Debug, Clone)]
pub struct AnimatorConfig {
    /// Lower bound of the randomized tick period (inclusive)
    pub tick_min: Duration,
    /// Upper bound of the randomized tick period (exclusive)
    pub tick_max: Duration,
    /// Upper bound of the random per-tick increment in percentage points
    /// (exclusive, must be positive)
    pub max_increment: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            tick_min: Duration::from_millis(200),
            tick_max: Duration::from_millis(500),
            max_increment: 5.0,
        }
    }
}

impl AnimatorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_min: Duration::from_millis(
                std::env::var("PITCHSIDE_ANIM_TICK_MIN_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tick_min.as_millis() as u64),
            ),
            tick_max: Duration::from_millis(
                std::env::var("PITCHSIDE_ANIM_TICK_MAX_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tick_max.as_millis() as u64),
            ),
            max_increment: defaults.max_increment,
        }
    }
}

/// Periodic task advancing a synthetic per-stage completion percentage.
///
/// Each tick sleeps a randomized period and adds a random increment, clamped
/// to 100. At exactly 100 the stage index advances and the percent resets;
/// past the last index the animator emits done and stops. The animator only
/// drives indices and percentages, never the result payload.
pub struct StageAnimator {
    handle: JoinHandle<()>,
}

impl StageAnimator {
    /// Spawn the animator at `start_index`, covering stages up to
    /// `stage_count`.
    pub fn start(
        config: AnimatorConfig,
        start_index: usize,
        stage_count: usize,
        generation: u64,
        tx: UnboundedSender<Envelope>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let send = |event: ControlEvent| tx.send(Envelope { generation, event }).is_ok();

            let mut stage_index = start_index;
            let mut stage_percent = 0.0f64;

            if stage_index >= stage_count {
                send(ControlEvent::AnimatorDone);
                return;
            }

            // Entering tick so the active stage shows up before the first
            // period elapses.
            if !send(ControlEvent::AnimatorTick {
                stage_index,
                stage_percent,
            }) {
                return;
            }

            loop {
                let delay = jitter(config.tick_min, config.tick_max);
                tokio::time::sleep(delay).await;

                let increment = rand::rng().random_range(0.0..config.max_increment);
                stage_percent = (stage_percent + increment).min(100.0);

                if !send(ControlEvent::AnimatorTick {
                    stage_index,
                    stage_percent,
                }) {
                    return;
                }

                if stage_percent >= 100.0 {
                    stage_index += 1;
                    if stage_index >= stage_count {
                        debug!("Stage animation complete after {} stages", stage_count);
                        send(ControlEvent::AnimatorDone);
                        return;
                    }
                    stage_percent = 0.0;
                    if !send(ControlEvent::AnimatorTick {
                        stage_index,
                        stage_percent,
                    }) {
                        return;
                    }
                }
            }
        });
        Self { handle }
    }

    /// Cancel the animator. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for StageAnimator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Random period in `[min, max)`, falling back to `min` when the range is
/// empty.
fn jitter(min: Duration, max: Duration) -> Duration {
    if max > min {
        let millis = rand::rng().random_range(min.as_millis() as u64..max.as_millis() as u64);
        Duration::from_millis(millis)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn fast_config() -> AnimatorConfig {
        AnimatorConfig {
            tick_min: Duration::from_millis(1),
            tick_max: Duration::from_millis(2),
            max_increment: 60.0,
        }
    }

    #[tokio::test]
    async fn test_runs_all_stages_then_signals_done() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _animator = StageAnimator::start(fast_config(), 0, 3, 0, tx);

        let mut last_index = 0usize;
        let mut last_percent = 0.0f64;
        loop {
            let envelope = rx.recv().await.unwrap();
            match envelope.event {
                ControlEvent::AnimatorTick {
                    stage_index,
                    stage_percent,
                } => {
                    // Index never decreases, percent stays in range.
                    assert!(stage_index >= last_index);
                    assert!((0.0..=100.0).contains(&stage_percent));
                    if stage_index > last_index {
                        assert_eq!(last_percent, 100.0);
                        assert_eq!(stage_percent, 0.0);
                    }
                    last_index = stage_index;
                    last_percent = stage_percent;
                }
                ControlEvent::AnimatorDone => break,
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert_eq!(last_index, 2);
        assert_eq!(last_percent, 100.0);
    }

    #[tokio::test]
    async fn test_start_past_last_stage_is_immediately_done() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _animator = StageAnimator::start(fast_config(), 3, 3, 0, tx);

        let envelope = rx.recv().await.unwrap();
        assert!(matches!(envelope.event, ControlEvent::AnimatorDone));
    }
}
