//! What's Cooking Adapters - External adapters for whats-cooking.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Model artifact discovery and loading

pub mod fs;
pub mod models;

pub use fs::FsImageSource;
pub use models::{
    default_model_dir, is_installed, load_classifier, ModelArtifact, METADATA_FILE, WEIGHTS_FILE,
};
