//! Events feeding the orchestrator.
//!
//! Timers and the upload task never touch session state directly; they send
//! generation-tagged envelopes into one channel that the orchestrator drains
//! from a single consumer loop. An envelope whose generation no longer
//! matches belongs to a superseded session and is discarded.

use pitchside_transport::{TransportResult, UploadResponse};

/// Event envelope tagged with the session generation it was produced for.
#[derive(Debug)]
pub struct Envelope {
    pub generation: u64,
    pub event: ControlEvent,
}

/// Events produced by the clock, the animator, and the upload task.
#[derive(Debug)]
pub enum ControlEvent {
    /// One second of wall-clock time elapsed.
    ClockTick,
    /// The transport started sending bytes.
    UploadStarted,
    /// Fraction of upload bytes sent, in `[0, 1]`.
    UploadProgress { fraction: f64 },
    /// Terminal upload result.
    UploadFinished(TransportResult<UploadResponse>),
    /// Synthetic progress within a stage.
    AnimatorTick { stage_index: usize, stage_percent: f64 },
    /// All stages consumed.
    AnimatorDone,
}
