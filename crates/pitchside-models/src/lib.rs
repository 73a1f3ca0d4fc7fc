//! Shared data models for the Pitchside client.
//!
//! This crate provides Serde-serializable types for:
//! - The processing stage catalog and overall-progress math
//! - Analytics returned by the processing server
//! - Upload file metadata and pre-flight validation

pub mod analytics;
pub mod stage;
pub mod upload;

// Re-export common types
pub use analytics::{AnalyticsResult, KeyMetrics, TeamPossession};
pub use stage::{StageCatalog, POST_UPLOAD_STAGE_INDEX, UPLOAD_STAGE_INDEX};
pub use upload::{UploadError, UploadFile, ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};
