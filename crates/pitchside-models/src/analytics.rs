//! Analytics returned by the processing server.
//!
//! These types mirror the server's JSON response verbatim. The client never
//! recomputes or rounds any of these values; they are display-only.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Possession split between the two teams.
///
/// The two percentages are displayed independently and need not sum to
/// exactly 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamPossession {
    pub team1: f64,
    pub team2: f64,
}

/// Scalar metrics computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyMetrics {
    /// Distinct players detected over the whole video
    pub total_players: u32,
    /// Average player speed in km/h
    pub avg_speed: f64,
    /// Total distance covered in meters
    pub total_distance: f64,
    /// Server-side processing time in seconds
    pub processing_time: f64,
    /// Source video duration, already formatted (e.g. "12:34")
    pub video_duration: String,
    /// Detection accuracy percentage
    pub detection_accuracy: f64,
}

/// Full analytics payload for one processed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticsResult {
    pub team_possession: TeamPossession,
    pub key_metrics: KeyMetrics,
}
