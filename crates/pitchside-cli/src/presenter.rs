//! Terminal rendering of the processing pipeline.

use std::io::{self, Write};

use pitchside_models::StageCatalog;
use pitchside_session::{format_elapsed, Presenter};
use pitchside_transport::UploadResponse;

/// Renders stage transitions, the overall progress line, and final results
/// to the terminal.
pub struct TerminalPresenter {
    catalog: StageCatalog,
    /// Base URL used to print the playable reference for a processed video.
    server_url: String,
    current_stage: usize,
    overall_percent: f64,
    elapsed_seconds: u64,
    /// Whether to write to stderr/stdout (false in tests)
    show_output: bool,
}

impl TerminalPresenter {
    pub fn new(catalog: StageCatalog, server_url: impl Into<String>) -> Self {
        Self {
            catalog,
            server_url: server_url.into(),
            current_stage: 0,
            overall_percent: 0.0,
            elapsed_seconds: 0,
            show_output: true,
        }
    }

    /// A presenter that renders nothing; state tracking only.
    pub fn quiet(catalog: StageCatalog, server_url: impl Into<String>) -> Self {
        Self {
            show_output: false,
            ..Self::new(catalog, server_url)
        }
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    pub fn overall_percent(&self) -> f64 {
        self.overall_percent
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    fn render_stage_list(&self) {
        if !self.show_output {
            return;
        }
        eprintln!();
        for (i, label) in self.catalog.labels().enumerate() {
            let marker = if i < self.current_stage {
                "✓"
            } else if i == self.current_stage {
                "»"
            } else {
                " "
            };
            eprintln!("  {} {}", marker, label);
        }
    }

    fn render_progress_line(&self) {
        if !self.show_output {
            return;
        }
        eprint!(
            "\r  {:>3.0}%  [{}]",
            self.overall_percent,
            format_elapsed(self.elapsed_seconds)
        );
        let _ = io::stderr().flush();
    }
}

impl Presenter for TerminalPresenter {
    fn stage_changed(&mut self, stage_index: usize, _label: &str) {
        self.current_stage = stage_index;
        self.render_stage_list();
    }

    fn progress(&mut self, overall_percent: f64) {
        self.overall_percent = overall_percent;
        self.render_progress_line();
    }

    fn elapsed(&mut self, seconds: u64) {
        self.elapsed_seconds = seconds;
        self.render_progress_line();
    }

    fn completed(&mut self, payload: Option<&UploadResponse>) {
        self.overall_percent = 100.0;
        if !self.show_output {
            return;
        }
        eprintln!();

        let Some(payload) = payload else {
            println!("Sample run complete. No processed video or analytics available.");
            return;
        };

        let analytics = &payload.analytics;
        println!(
            "Processed video: {}/download/{}",
            self.server_url, payload.processed_video_url
        );
        println!();
        println!("Team possession");
        println!("  Team 1: {}%", analytics.team_possession.team1);
        println!("  Team 2: {}%", analytics.team_possession.team2);
        println!();
        println!("Key metrics");
        println!("  Total players:      {}", analytics.key_metrics.total_players);
        println!("  Average speed:      {} km/h", analytics.key_metrics.avg_speed);
        println!("  Total distance:     {} m", analytics.key_metrics.total_distance);
        println!("  Processing time:    {}s", analytics.key_metrics.processing_time);
        println!("  Video duration:     {}", analytics.key_metrics.video_duration);
        println!("  Detection accuracy: {}%", analytics.key_metrics.detection_accuracy);
    }

    fn failed(&mut self, message: &str) {
        if self.show_output {
            eprintln!();
            eprintln!("{message}");
        }
    }

    fn clear(&mut self) {
        self.current_stage = 0;
        self.overall_percent = 0.0;
        self.elapsed_seconds = 0;
    }
}
