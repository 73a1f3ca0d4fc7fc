//! HTTP transport for the Pitchside processing server.
//!
//! This crate provides:
//! - Multipart video upload with byte-level progress reporting
//! - Download of the processed video to a local path
//!
//! The transport performs no retries and touches no UI state; terminal
//! results and progress events are handed back to the caller.

pub mod client;
pub mod error;
pub mod types;

pub use client::{UploadClient, UploadClientConfig};
pub use error::{TransportError, TransportResult};
pub use types::{TransferProgress, UploadResponse};
