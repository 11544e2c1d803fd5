//! Model artifact discovery and loading.
//!
//! An artifact is a directory produced by the export step:
//!
//! ```text
//! best_model/
//! ├── metadata.json      task, scale, imgsz, class names, optional sha256
//! └── model.safetensors  YOLOv8-cls weights
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use candle_core::Device;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use whats_cooking_core::inference::var_builder_from_bytes;
use whats_cooking_core::{LoadError, ModelMetadata, YoloClassifier};

/// Weights filename inside an artifact directory.
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Metadata filename inside an artifact directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Returns the default model directory.
///
/// Uses `XDG_DATA_HOME/whats-cooking/model` or `~/.local/share/whats-cooking/model`.
#[must_use]
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("whats-cooking")
        .join("model")
}

/// A validated model artifact directory.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    dir: PathBuf,
    /// Parsed and validated metadata.
    pub metadata: ModelMetadata,
}

impl ModelArtifact {
    /// Opens an artifact directory and validates its metadata.
    ///
    /// Does not read the weights.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory, metadata or weights file does not exist
    /// - The metadata cannot be read, parsed or validated
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoadError::Missing {
                path: dir.to_path_buf(),
            });
        }

        let metadata_path = dir.join(METADATA_FILE);
        let metadata = read_metadata(&metadata_path)?;
        metadata.validate()?;

        let weights_path = dir.join(WEIGHTS_FILE);
        if !weights_path.is_file() {
            return Err(LoadError::Missing { path: weights_path });
        }

        debug!(
            "Opened model artifact {} ({} classes)",
            dir.display(),
            metadata.num_classes()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            metadata,
        })
    }

    /// The artifact directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the weights file.
    #[must_use]
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    /// Path to the metadata file.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Reads the weights, verifying the checksum when the metadata has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its checksum differs.
    pub fn read_weights(&self) -> Result<Vec<u8>, LoadError> {
        let path = self.weights_path();
        let bytes = fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        match self.metadata.sha256.as_deref() {
            Some(expected) => {
                let actual = sha256_hex(&bytes);
                if !actual.eq_ignore_ascii_case(expected) {
                    return Err(LoadError::ChecksumMismatch {
                        path,
                        expected: expected.to_string(),
                        actual,
                    });
                }
                debug!("Checksum verified for {}", path.display());
            }
            None => debug!("No checksum recorded for {}", path.display()),
        }

        Ok(bytes)
    }
}

/// Returns true if `dir` looks like a model artifact.
#[must_use]
pub fn is_installed(dir: &Path) -> bool {
    dir.join(METADATA_FILE).is_file() && dir.join(WEIGHTS_FILE).is_file()
}

/// Loads the classifier stored in an artifact directory.
///
/// # Errors
///
/// Returns an error if the artifact is missing, malformed, or its weights do
/// not fit the network its metadata describes.
pub fn load_classifier(dir: &Path, device: &Device) -> Result<YoloClassifier, LoadError> {
    let artifact = ModelArtifact::open(dir)?;
    let weights = artifact.read_weights()?;
    let vb = var_builder_from_bytes(&artifact.weights_path(), &weights, device)?;
    let classifier = YoloClassifier::new(vb, &artifact.metadata)?;

    info!(
        "Loaded YOLOv8{}-cls classifier with {} classes from {}",
        artifact.metadata.scale,
        artifact.metadata.num_classes(),
        dir.display()
    );

    Ok(classifier)
}

fn read_metadata(path: &Path) -> Result<ModelMetadata, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
