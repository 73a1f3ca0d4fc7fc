//! Processing session state.

use uuid::Uuid;

use pitchside_transport::UploadResponse;

/// Execution path for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Real network upload with server-computed results.
    Live,
    /// Entirely synthetic run with no network call and no payload.
    Sample,
}

/// Where the session currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the transport (live mode only).
    Uploading,
    /// Stage animator driving synthetic progress.
    Animating,
    /// All stages consumed; retained read-only for display.
    Completed,
}

/// One end-to-end run from start to completion or reset.
///
/// The stage index only ever increases over a session's lifetime, and the
/// stage-local percent resets to zero whenever the index advances.
#[derive(Debug)]
pub struct ProcessingSession {
    id: Uuid,
    mode: Mode,
    phase: Phase,
    stage_index: usize,
    stage_percent: f64,
    elapsed_seconds: u64,
    payload: Option<UploadResponse>,
}

impl ProcessingSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            phase: match mode {
                Mode::Live => Phase::Uploading,
                Mode::Sample => Phase::Animating,
            },
            stage_index: 0,
            stage_percent: 0.0,
            elapsed_seconds: 0,
            payload: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn stage_percent(&self) -> f64 {
        self.stage_percent
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn payload(&self) -> Option<&UploadResponse> {
        self.payload.as_ref()
    }

    /// Advance to a later stage. Requests for an earlier stage are ignored;
    /// the index never decreases within one session.
    pub fn advance_to(&mut self, stage_index: usize) {
        if stage_index > self.stage_index {
            self.stage_index = stage_index;
            self.stage_percent = 0.0;
        }
    }

    /// Set progress within the active stage, clamped to `[0, 100]`.
    pub fn set_stage_percent(&mut self, percent: f64) {
        self.stage_percent = percent.clamp(0.0, 100.0);
    }

    /// Count one second of wall-clock time.
    pub fn tick_elapsed(&mut self) {
        self.elapsed_seconds += 1;
    }

    /// Store the server payload (live mode, after transport success).
    pub fn store_payload(&mut self, payload: UploadResponse) {
        self.payload = Some(payload);
    }

    /// Switch to the animating phase at the given stage.
    pub fn begin_animating(&mut self, stage_index: usize) {
        self.phase = Phase::Animating;
        self.advance_to(stage_index);
    }

    /// Mark the whole pipeline complete. `stage_count` stages consumed means
    /// the index lands on N and the overall bar reads exactly 100.
    pub fn complete(&mut self, stage_count: usize) {
        self.phase = Phase::Completed;
        self.advance_to(stage_count);
    }
}
