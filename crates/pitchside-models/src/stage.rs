//! Processing stage catalog and overall-progress math.

/// Stage index reserved for the network upload in live runs.
pub const UPLOAD_STAGE_INDEX: usize = 1;

/// First stage animated after a successful upload.
pub const POST_UPLOAD_STAGE_INDEX: usize = 2;

/// Ordered, immutable list of pipeline stage labels.
///
/// Indexing is always in `[0, len)`; an index equal to `len` means the whole
/// pipeline is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    labels: Vec<String>,
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self {
            labels: [
                "Initializing...",
                "Uploading video...",
                "Analyzing frames...",
                "Detecting players and ball...",
                "Assigning teams...",
                "Tracking movement...",
                "Calculating speed and distance...",
                "Generating analytics...",
                "Finalizing video...",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl StageCatalog {
    /// Create a catalog from a list of labels.
    ///
    /// Returns `None` for an empty list; a catalog always has at least one
    /// stage.
    pub fn new(labels: Vec<String>) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        Some(Self { labels })
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for a stage index, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Iterate over all labels in pipeline order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Combined progress-bar value for the whole pipeline.
    ///
    /// Each stage contributes an equal `1/N` share of the bar, and partial
    /// progress within the active stage contributes its fraction of that
    /// share. Reaches exactly 100 when `stage_index == N`.
    pub fn overall_percent(&self, stage_index: usize, stage_percent: f64) -> f64 {
        let n = self.labels.len() as f64;
        (stage_index as f64 / n + stage_percent / 100.0 / n) * 100.0
    }
}
