//! Classification and prediction result types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Raw top-1 output of a classifier pass.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Index of the highest-scoring class.
    pub top_index: usize,
    /// Probability of that class, 0.0 to 1.0.
    pub top_confidence: f32,
    /// The model's fixed label table.
    pub labels: Arc<[String]>,
}

/// The single best guess for an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Human-readable class label.
    pub label: String,
    /// Confidence as a percentage, 0.0 to 100.0.
    pub confidence: f32,
}

impl Prediction {
    /// Builds a prediction from a raw probability in `[0, 1]`.
    #[must_use]
    pub fn from_score(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            confidence: score * 100.0,
        }
    }

    /// Confidence rendered with two decimals, e.g. `87.34%`.
    #[must_use]
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.confidence_display())
    }
}

/// What happened to one image of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The image was classified.
    Classified {
        /// Predicted label.
        label: String,
        /// Confidence percentage.
        confidence: f32,
    },
    /// Loading or inference failed for this image.
    Failed {
        /// Error description.
        error: String,
    },
}

impl From<Prediction> for Outcome {
    fn from(prediction: Prediction) -> Self {
        Self::Classified {
            label: prediction.label,
            confidence: prediction.confidence,
        }
    }
}

/// Output record for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Path of the image.
    pub path: String,
    /// Timestamp of the prediction (RFC 3339, UTC).
    pub timestamp: String,
    /// Result of the prediction.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl PredictionRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn now(path: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            path: path.into(),
            timestamp: iso_timestamp(),
            outcome,
        }
    }

    /// Returns true if the image was classified.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        matches!(self.outcome, Outcome::Classified { .. })
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|e| {
            tracing::debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        })
}
