//! Error kinds surfaced by model loading and inference.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a usable model from its artifact directory.
///
/// Always fatal to the request that triggered the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model metadata {}: {source}", path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model metadata: {message}")]
    InvalidMetadata { message: String },

    #[error("failed to parse safetensors {}: {source}", path.display())]
    Safetensors {
        path: PathBuf,
        #[source]
        source: safetensors::SafeTensorError,
    },

    #[error("unsupported tensor dtype {dtype} for '{name}'")]
    UnsupportedDtype { name: String, dtype: String },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("model weights do not match the network: {0}")]
    Weights(#[from] candle_core::Error),
}

/// Failure of a single prediction request.
///
/// Recoverable: the batch runner records it and moves on.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("inference failed: {0}")]
    Backend(#[from] candle_core::Error),

    #[error("invalid model output: {message}")]
    InvalidOutput { message: String },
}

impl InferenceError {
    pub(crate) fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }
}

impl LoadError {
    pub(crate) fn invalid_metadata(message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }
}

/// Any failure of the prediction pipeline, for callers that do not need to branch.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_path() {
        let err = LoadError::Missing {
            path: PathBuf::from("best_model/metadata.json"),
        };
        assert!(err.to_string().contains("best_model/metadata.json"));
    }

    #[test]
    fn test_umbrella_error_is_transparent() {
        let err: Error = InferenceError::invalid_output("index 9 out of range").into();
        assert_eq!(
            err.to_string(),
            "invalid model output: index 9 out of range"
        );
    }
}
