//! Processing orchestrator state machine.
//!
//! Coordinates the wall clock, the stage animator, and the upload transport
//! for one session at a time. Live runs go Idle → Uploading → Animating →
//! Completed; sample runs skip straight to Animating with no payload. Any
//! state returns to Idle via reset.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use pitchside_models::{StageCatalog, UploadFile, POST_UPLOAD_STAGE_INDEX, UPLOAD_STAGE_INDEX};
use pitchside_transport::{UploadClient, UploadResponse};

use crate::animator::{AnimatorConfig, StageAnimator};
use crate::clock::ProgressClock;
use crate::error::{SessionError, SessionResult};
use crate::events::{ControlEvent, Envelope};
use crate::presenter::Presenter;
use crate::session::{Mode, Phase, ProcessingSession};

/// Single user-facing notice for any failed run; network errors and rejected
/// uploads are deliberately not distinguished here.
const PROCESSING_FAILED_NOTICE: &str = "Processing failed. Please try again.";

/// Orchestrator timing configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Wall-clock tick period
    pub clock_period: Duration,
    /// Stage animator timing
    pub animator: AnimatorConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            clock_period: Duration::from_secs(1),
            animator: AnimatorConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            clock_period: Duration::from_secs(1),
            animator: AnimatorConfig::from_env(),
        }
    }
}

/// Terminal outcome of driving a session to its end.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Pipeline completed; payload present for live runs only.
    Completed(Option<UploadResponse>),
    /// Transport failure ended the session.
    Failed,
}

/// State machine coordinating clock, animator, and transport.
pub struct Orchestrator<P: Presenter> {
    catalog: StageCatalog,
    config: OrchestratorConfig,
    transport: Arc<UploadClient>,
    presenter: P,
    tx: UnboundedSender<Envelope>,
    rx: UnboundedReceiver<Envelope>,
    generation: u64,
    session: Option<ProcessingSession>,
    clock: Option<ProgressClock>,
    animator: Option<StageAnimator>,
    upload: Option<JoinHandle<()>>,
}

impl<P: Presenter> Orchestrator<P> {
    pub fn new(
        catalog: StageCatalog,
        config: OrchestratorConfig,
        transport: Arc<UploadClient>,
        presenter: P,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            config,
            transport,
            presenter,
            tx,
            rx,
            generation: 0,
            session: None,
            clock: None,
            animator: None,
            upload: None,
        }
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn session(&self) -> Option<&ProcessingSession> {
        self.session.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Start a live run: validate the file, enter Uploading, start the
    /// clock, and hand the file to the transport.
    ///
    /// Validation failures reject the file before any network call; the
    /// session never starts and no state changes.
    pub fn start_live(&mut self, file: UploadFile) -> SessionResult<()> {
        if self.session.is_some() {
            return Err(SessionError::SessionActive);
        }
        file.validate()?;

        let session = ProcessingSession::new(Mode::Live);
        info!(
            session_id = %session.id(),
            file = %file.file_name(),
            "Starting live processing run"
        );

        self.enter_stage_display(0);
        self.start_clock();

        let tx = self.tx.clone();
        let generation = self.generation;
        let transport = self.transport.clone();
        let handle = tokio::spawn(async move {
            let _ = tx.send(Envelope {
                generation,
                event: ControlEvent::UploadStarted,
            });

            let progress_tx = tx.clone();
            let result = transport
                .send(&file, move |p| {
                    let _ = progress_tx.send(Envelope {
                        generation,
                        event: ControlEvent::UploadProgress {
                            fraction: p.fraction(),
                        },
                    });
                })
                .await;

            let _ = tx.send(Envelope {
                generation,
                event: ControlEvent::UploadFinished(result),
            });
        });
        self.upload = Some(handle);
        self.session = Some(session);

        Ok(())
    }

    /// Start a sample run: no network call, the animator drives every stage
    /// from index 0 and the session completes without a payload.
    pub fn start_sample(&mut self) -> SessionResult<()> {
        if self.session.is_some() {
            return Err(SessionError::SessionActive);
        }

        let session = ProcessingSession::new(Mode::Sample);
        info!(session_id = %session.id(), "Starting sample run");

        self.enter_stage_display(0);
        self.start_clock();
        self.start_animator(0);
        self.session = Some(session);

        Ok(())
    }

    /// Tear down the current session, whatever state it is in, and restore
    /// the presenter to defaults. Safe to call repeatedly and while idle.
    pub fn reset(&mut self) {
        self.teardown();
        self.presenter.clear();
    }

    /// Drive the session to its terminal state, applying events as they
    /// arrive. Call after a successful `start_live`/`start_sample`.
    pub async fn run(&mut self) -> SessionOutcome {
        while let Some(envelope) = self.rx.recv().await {
            self.apply(envelope);

            match self.session.as_ref().map(ProcessingSession::phase) {
                Some(Phase::Completed) => {
                    let payload = self.session.as_ref().and_then(|s| s.payload()).cloned();
                    return SessionOutcome::Completed(payload);
                }
                None => return SessionOutcome::Failed,
                _ => {}
            }
        }
        SessionOutcome::Failed
    }

    /// Apply one event to the session.
    ///
    /// Envelopes from a superseded generation are discarded here; this is
    /// the only place session state is mutated, so late timer or transport
    /// callbacks can never corrupt a newer session.
    pub(crate) fn apply(&mut self, envelope: Envelope) {
        if envelope.generation != self.generation {
            debug!("Discarding event from superseded session");
            return;
        }

        match envelope.event {
            ControlEvent::ClockTick => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if session.phase() == Phase::Completed {
                    return;
                }
                session.tick_elapsed();
                self.presenter.elapsed(session.elapsed_seconds());
            }

            ControlEvent::UploadStarted => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if session.phase() != Phase::Uploading {
                    return;
                }
                session.advance_to(UPLOAD_STAGE_INDEX);
                if let Some(label) = self.catalog.label(UPLOAD_STAGE_INDEX) {
                    self.presenter.stage_changed(UPLOAD_STAGE_INDEX, label);
                }
            }

            ControlEvent::UploadProgress { fraction } => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if session.phase() != Phase::Uploading
                    || session.stage_index() != UPLOAD_STAGE_INDEX
                {
                    return;
                }
                session.set_stage_percent(fraction * 100.0);
                self.presenter.progress(
                    self.catalog
                        .overall_percent(session.stage_index(), session.stage_percent()),
                );
            }

            ControlEvent::UploadFinished(Ok(payload)) => {
                {
                    let Some(session) = self.session.as_mut() else {
                        return;
                    };
                    if session.phase() != Phase::Uploading {
                        return;
                    }
                    info!(session_id = %session.id(), "Upload complete, server results stored");
                    session.store_payload(payload);
                    session.begin_animating(POST_UPLOAD_STAGE_INDEX);
                }
                self.upload = None;
                if let Some(label) = self.catalog.label(POST_UPLOAD_STAGE_INDEX) {
                    self.presenter
                        .stage_changed(POST_UPLOAD_STAGE_INDEX, label);
                }
                // Real work finished server-side; the remaining stages are
                // animated so the bar does not jump straight to 100%.
                self.start_animator(POST_UPLOAD_STAGE_INDEX);
            }

            ControlEvent::UploadFinished(Err(e)) => {
                if self.session.is_none() {
                    return;
                }
                warn!("Upload failed: {}", e);
                self.presenter.failed(PROCESSING_FAILED_NOTICE);
                self.teardown();
                self.presenter.clear();
            }

            ControlEvent::AnimatorTick {
                stage_index,
                stage_percent,
            } => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if session.phase() != Phase::Animating || stage_index < session.stage_index() {
                    return;
                }
                if stage_index > session.stage_index() {
                    session.advance_to(stage_index);
                    if let Some(label) = self.catalog.label(stage_index) {
                        self.presenter.stage_changed(stage_index, label);
                    }
                }
                session.set_stage_percent(stage_percent);
                self.presenter.progress(
                    self.catalog
                        .overall_percent(session.stage_index(), session.stage_percent()),
                );
            }

            ControlEvent::AnimatorDone => {
                {
                    let Some(session) = self.session.as_mut() else {
                        return;
                    };
                    if session.phase() != Phase::Animating {
                        return;
                    }
                    info!(session_id = %session.id(), "Pipeline complete");
                    session.complete(self.catalog.len());
                }
                if let Some(clock) = self.clock.take() {
                    clock.stop();
                }
                if let Some(animator) = self.animator.take() {
                    animator.stop();
                }
                self.presenter.progress(100.0);
                self.presenter
                    .completed(self.session.as_ref().and_then(|s| s.payload()));
            }
        }
    }

    /// Cancel timers and the upload task, discard the session, and advance
    /// the generation so anything still in flight is ignored on arrival.
    fn teardown(&mut self) {
        self.generation += 1;
        if let Some(clock) = self.clock.take() {
            clock.stop();
        }
        if let Some(animator) = self.animator.take() {
            animator.stop();
        }
        if let Some(upload) = self.upload.take() {
            upload.abort();
        }
        self.session = None;
    }

    fn enter_stage_display(&mut self, stage_index: usize) {
        if let Some(label) = self.catalog.label(stage_index) {
            self.presenter.stage_changed(stage_index, label);
        }
        self.presenter.progress(0.0);
        self.presenter.elapsed(0);
    }

    fn start_clock(&mut self) {
        self.clock = Some(ProgressClock::start(
            self.config.clock_period,
            self.generation,
            self.tx.clone(),
        ));
    }

    fn start_animator(&mut self, start_index: usize) {
        self.animator = Some(StageAnimator::start(
            self.config.animator.clone(),
            start_index,
            self.catalog.len(),
            self.generation,
            self.tx.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use pitchside_models::{AnalyticsResult, KeyMetrics, TeamPossession, MAX_UPLOAD_BYTES};
    use pitchside_transport::{TransportError, UploadClientConfig};

    use super::*;

    #[derive(Default)]
    struct RecordingPresenter {
        stages: Vec<usize>,
        progress: Vec<f64>,
        elapsed: Vec<u64>,
        completed: Vec<Option<UploadResponse>>,
        failures: Vec<String>,
        clears: usize,
    }

    impl Presenter for RecordingPresenter {
        fn stage_changed(&mut self, stage_index: usize, _label: &str) {
            self.stages.push(stage_index);
        }
        fn progress(&mut self, overall_percent: f64) {
            self.progress.push(overall_percent);
        }
        fn elapsed(&mut self, seconds: u64) {
            self.elapsed.push(seconds);
        }
        fn completed(&mut self, payload: Option<&UploadResponse>) {
            self.completed.push(payload.cloned());
        }
        fn failed(&mut self, message: &str) {
            self.failures.push(message.to_string());
        }
        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    fn sample_payload() -> UploadResponse {
        UploadResponse {
            processed_video_url: "abc123".to_string(),
            analytics: AnalyticsResult {
                team_possession: TeamPossession {
                    team1: 55.0,
                    team2: 45.0,
                },
                key_metrics: KeyMetrics {
                    total_players: 22,
                    avg_speed: 15.2,
                    total_distance: 88000.0,
                    processing_time: 120.0,
                    video_duration: "10:00".to_string(),
                    detection_accuracy: 92.5,
                },
            },
        }
    }

    fn orchestrator() -> Orchestrator<RecordingPresenter> {
        let transport = Arc::new(UploadClient::new(UploadClientConfig::default()).unwrap());
        Orchestrator::new(
            StageCatalog::default(),
            OrchestratorConfig::default(),
            transport,
            RecordingPresenter::default(),
        )
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let mut orch = orchestrator();

        orch.reset();
        orch.reset();
        assert!(orch.is_idle());
        assert_eq!(orch.presenter().clears, 2);

        orch.start_sample().unwrap();
        assert!(!orch.is_idle());
        orch.reset();
        orch.reset();
        assert!(orch.is_idle());
    }

    #[tokio::test]
    async fn test_second_start_rejected_while_active() {
        let mut orch = orchestrator();
        orch.start_sample().unwrap();
        assert!(matches!(
            orch.start_sample(),
            Err(SessionError::SessionActive)
        ));
    }

    #[tokio::test]
    async fn test_oversize_file_never_starts_session() {
        let mut orch = orchestrator();
        let file = UploadFile::new("/tmp/huge.mp4", MAX_UPLOAD_BYTES + 1);

        assert!(matches!(
            orch.start_live(file),
            Err(SessionError::Rejected(_))
        ));
        assert!(orch.is_idle());
        assert!(orch.presenter().stages.is_empty());
    }

    #[tokio::test]
    async fn test_stale_success_after_reset_mutates_nothing() {
        let mut orch = orchestrator();
        orch.start_sample().unwrap();
        let stale_generation = 0;
        orch.reset();

        let clears_before = orch.presenter().clears;
        orch.apply(Envelope {
            generation: stale_generation,
            event: ControlEvent::UploadFinished(Ok(sample_payload())),
        });

        assert!(orch.is_idle());
        assert!(orch.presenter().completed.is_empty());
        assert_eq!(orch.presenter().clears, clears_before);
    }

    #[tokio::test]
    async fn test_upload_progress_maps_to_upload_stage_share() {
        let mut orch = orchestrator();
        let file = UploadFile::new("/tmp/match.mp4", 1024);
        orch.start_live(file).unwrap();
        let generation = orch.generation;

        orch.apply(Envelope {
            generation,
            event: ControlEvent::UploadStarted,
        });
        orch.apply(Envelope {
            generation,
            event: ControlEvent::UploadProgress { fraction: 0.5 },
        });

        let session = orch.session().unwrap();
        assert_eq!(session.stage_index(), UPLOAD_STAGE_INDEX);
        assert_eq!(session.stage_percent(), 50.0);

        // Stage 1 of 9 at 50%: (1/9 + 0.5/9) * 100.
        let expected = (1.0 / 9.0 + 0.5 / 9.0) * 100.0;
        let last = *orch.presenter().progress.last().unwrap();
        assert!((last - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_to_idle_and_stops_clock() {
        let mut orch = orchestrator();
        let file = UploadFile::new("/tmp/match.mp4", 1024);
        orch.start_live(file).unwrap();
        let generation = orch.generation;

        orch.apply(Envelope {
            generation,
            event: ControlEvent::ClockTick,
        });
        orch.apply(Envelope {
            generation,
            event: ControlEvent::UploadFinished(Err(TransportError::RequestFailed {
                status: 500,
                body: String::new(),
            })),
        });

        assert!(orch.is_idle());
        assert_eq!(orch.presenter().failures.len(), 1);
        assert_eq!(orch.presenter().clears, 1);

        // A tick queued before the failure was processed belongs to the old
        // generation now and is dropped.
        orch.apply(Envelope {
            generation,
            event: ControlEvent::ClockTick,
        });
        assert_eq!(orch.presenter().elapsed, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_clock_tick_after_completion_is_ignored() {
        let mut orch = orchestrator();
        orch.start_sample().unwrap();
        let generation = orch.generation;

        orch.apply(Envelope {
            generation,
            event: ControlEvent::AnimatorDone,
        });
        assert_eq!(orch.session().unwrap().phase(), Phase::Completed);

        orch.apply(Envelope {
            generation,
            event: ControlEvent::ClockTick,
        });
        assert_eq!(orch.session().unwrap().elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_animator_done_presents_placeholder_for_sample() {
        let mut orch = orchestrator();
        orch.start_sample().unwrap();
        let generation = orch.generation;

        orch.apply(Envelope {
            generation,
            event: ControlEvent::AnimatorDone,
        });

        assert_eq!(orch.presenter().completed.len(), 1);
        assert!(orch.presenter().completed[0].is_none());
        assert_eq!(*orch.presenter().progress.last().unwrap(), 100.0);
    }
}
