//! Upload file metadata and pre-flight validation.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Maximum accepted upload size (500 MiB). Larger files are rejected before
/// any network call is made.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Video file extensions accepted by the processing server.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Pre-flight validation errors for a selected file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("file is too large ({size_bytes} bytes); maximum size is 500 MiB")]
    Oversize { size_bytes: u64 },

    #[error("unsupported file format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },
}

/// A video file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    path: PathBuf,
    file_name: String,
    size_bytes: u64,
}

impl UploadFile {
    /// Describe a selected file. Validation happens separately via
    /// [`UploadFile::validate`]; construction never touches the filesystem.
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        Self {
            path,
            file_name,
            size_bytes,
        }
    }

    /// Check the size cap and extension allow-list.
    ///
    /// Violating files must never be submitted to the transport.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(UploadError::Oversize {
                size_bytes: self.size_bytes,
            });
        }

        let extension = self.extension();
        match &extension {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(UploadError::UnsupportedFormat { extension }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// MIME type derived from the extension, defaulting to a generic video
    /// type for unknown extensions.
    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("mp4") => "video/mp4",
            Some("avi") => "video/x-msvideo",
            Some("mov") => "video/quicktime",
            Some("mkv") => "video/x-matroska",
            Some("wmv") => "video/x-ms-wmv",
            Some("flv") => "video/x-flv",
            Some("webm") => "video/webm",
            _ => "video/mp4",
        }
    }

    /// Human-readable summary shown on selection, e.g.
    /// `Size: 12.34 MB | Type: video/mp4`.
    pub fn summary(&self) -> String {
        format!(
            "Size: {:.2} MB | Type: {}",
            self.size_bytes as f64 / 1024.0 / 1024.0,
            self.mime_type()
        )
    }
}

impl fmt::Display for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name)
    }
}
