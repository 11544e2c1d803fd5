//! Core domain types for food classification.

mod image;
mod metadata;
mod prediction;

pub use image::{ImageInfo, SourcedImage};
pub use metadata::{ImageSize, ModelMetadata, ModelScale};
pub use prediction::{Classification, Outcome, Prediction, PredictionRecord};
