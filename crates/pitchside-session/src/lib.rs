//! Staged processing orchestration for the Pitchside client.
//!
//! This crate provides:
//! - The processing session state machine (idle, uploading, animating,
//!   completed) with its two execution paths: live upload and sample run
//! - A wall-clock ticker and a synthetic stage animator as cancellable tasks
//! - A presenter seam the binary plugs its rendering into
//! - Generation-tagged events so callbacks from a superseded session are
//!   silently discarded

pub mod animator;
pub mod clock;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod presenter;
pub mod session;

pub use animator::{AnimatorConfig, StageAnimator};
pub use clock::{format_elapsed, ProgressClock};
pub use error::{SessionError, SessionResult};
pub use orchestrator::{Orchestrator, OrchestratorConfig, SessionOutcome};
pub use presenter::Presenter;
pub use session::{Mode, Phase, ProcessingSession};
