//! Presenter seam between the orchestrator and the display.

use pitchside_transport::UploadResponse;

/// Rendering surface driven by the orchestrator.
///
/// Implementations display state, they never own it: all values arrive
/// pre-computed and are shown verbatim. The terminal renderer in the binary
/// is the production implementation; tests use recording stand-ins.
pub trait Presenter {
    /// A new stage became active.
    fn stage_changed(&mut self, stage_index: usize, label: &str);

    /// Overall progress-bar value changed, in `[0, 100]`.
    fn progress(&mut self, overall_percent: f64);

    /// Elapsed wall-clock seconds changed.
    fn elapsed(&mut self, seconds: u64);

    /// The pipeline finished. With a payload, show the processed video
    /// reference and every analytics field verbatim; with none (sample
    /// mode), leave the video area in placeholder state and analytics at
    /// their defaults.
    fn completed(&mut self, payload: Option<&UploadResponse>);

    /// A run failed; show a single user-facing notice.
    fn failed(&mut self, message: &str);

    /// Restore all displayed fields to their zero/default state.
    fn clear(&mut self);
}
