//! Transport request/response types.

use serde::{Deserialize, Serialize};

use pitchside_models::AnalyticsResult;

/// Successful response from `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Download identifier for the processed video, resolvable via
    /// `GET /download/{processed_video_url}`.
    pub processed_video_url: String,
    /// Analytics computed server-side, displayed verbatim.
    pub analytics: AnalyticsResult,
}

/// Byte-level progress of an in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

impl TransferProgress {
    /// Fraction sent in `[0, 1]`. Zero-byte transfers report complete.
    pub fn fraction(&self) -> f64 {
        if self.bytes_total == 0 {
            return 1.0;
        }
        (self.bytes_sent as f64 / self.bytes_total as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let p = TransferProgress {
            bytes_sent: 250,
            bytes_total: 1000,
        };
        assert!((p.fraction() - 0.25).abs() < 1e-9);

        let done = TransferProgress {
            bytes_sent: 0,
            bytes_total: 0,
        };
        assert_eq!(done.fraction(), 1.0);
    }
}
