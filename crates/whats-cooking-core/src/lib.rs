//! What's Cooking Core - Domain logic and inference
//!
//! This crate contains the domain types, port traits, the YOLOv8 classification
//! backend, the cached model provider, and the prediction and batch pipeline.

pub mod batch;
pub mod domain;
pub mod error;
pub mod inference;
pub mod ports;
pub mod predict;

pub use batch::{run_batch, BatchSummary};
pub use domain::{
    Classification, ImageInfo, ModelMetadata, ModelScale, Outcome, Prediction,
    PredictionRecord, SourcedImage,
};
pub use error::{Error, InferenceError, LoadError};
pub use inference::{ModelProvider, YoloClassifier, YoloV8Cls};
pub use ports::{Classifier, ImageSource, ProgressEvent, ProgressSink, ResultOutput};
pub use predict::{predict, predict_bytes};
