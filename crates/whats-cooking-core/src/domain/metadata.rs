//! Model artifact metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

const CLASSIFY_TASK: &str = "classify";
const DEFAULT_IMAGE_SIZE: usize = 224;

/// Contents of `metadata.json` in a model artifact directory.
///
/// Mirrors the fields an Ultralytics export records for a classification model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model task; must be `classify`.
    #[serde(default = "default_task")]
    pub task: String,
    /// Width/depth scale of the network.
    #[serde(default)]
    pub scale: ModelScale,
    /// Input size the model was trained at.
    #[serde(default)]
    pub imgsz: ImageSize,
    /// Class index to label table.
    pub names: BTreeMap<usize, String>,
    /// Optional SHA-256 of `model.safetensors`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

fn default_task() -> String {
    CLASSIFY_TASK.to_string()
}

impl ModelMetadata {
    /// Creates metadata for a classification model with the given labels.
    #[must_use]
    pub fn new<S: Into<String>>(scale: ModelScale, imgsz: usize, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            task: default_task(),
            scale,
            imgsz: ImageSize::Square(imgsz),
            names: labels.into_iter().map(Into::into).enumerate().collect(),
            sha256: None,
        }
    }

    /// Checks the metadata describes a usable classifier.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidMetadata`] if the task is not `classify`,
    /// the label table is empty or has gaps, or the input size is zero.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.task != CLASSIFY_TASK {
            return Err(LoadError::invalid_metadata(format!(
                "task must be '{CLASSIFY_TASK}', got '{}'",
                self.task
            )));
        }
        if self.names.is_empty() {
            return Err(LoadError::invalid_metadata("names must not be empty"));
        }
        if let Some((expected, found)) = self
            .names
            .keys()
            .enumerate()
            .find(|(expected, found)| expected != *found)
        {
            return Err(LoadError::invalid_metadata(format!(
                "names must be numbered from 0 without gaps: expected {expected}, found {found}"
            )));
        }
        let (height, width) = self.imgsz.height_width();
        if height == 0 || width == 0 {
            return Err(LoadError::invalid_metadata("imgsz must be positive"));
        }
        Ok(())
    }

    /// Number of classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Label table ordered by class index.
    #[must_use]
    pub fn labels(&self) -> Arc<[String]> {
        self.names.values().cloned().collect()
    }
}

/// Network input size, either square or `[height, width]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSize {
    /// Square input.
    Square(usize),
    /// `[height, width]`.
    HeightWidth([usize; 2]),
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::Square(DEFAULT_IMAGE_SIZE)
    }
}

impl ImageSize {
    /// Returns `(height, width)`.
    #[must_use]
    pub const fn height_width(self) -> (usize, usize) {
        match self {
            Self::Square(size) => (size, size),
            Self::HeightWidth([h, w]) => (h, w),
        }
    }
}

/// YOLOv8 model scale.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelScale {
    /// Nano.
    #[default]
    N,
    /// Small.
    S,
    /// Medium.
    M,
    /// Large.
    L,
    /// Extra large.
    X,
}

impl ModelScale {
    /// Returns `(depth_multiple, width_multiple, max_channels)`.
    #[must_use]
    pub const fn multiples(self) -> (f64, f64, usize) {
        match self {
            Self::N => (0.33, 0.25, 1024),
            Self::S => (0.33, 0.50, 1024),
            Self::M => (0.67, 0.75, 1024),
            Self::L => (1.00, 1.00, 1024),
            Self::X => (1.00, 1.25, 1024),
        }
    }
}

impl fmt::Display for ModelScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::N => "n",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::X => "x",
        };
        f.write_str(name)
    }
}
