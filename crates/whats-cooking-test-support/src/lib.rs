//! Test support utilities for whats-cooking.
//!
//! Provides mocks of every port, synthetic image builders, and a writer for
//! small randomly initialized model artifacts.
//!
//! # Example
//!
//! ```
//! use whats_cooking_test_support::{MockClassifier, SyntheticImageBuilder};
//! use whats_cooking_core::predict;
//!
//! let classifier = MockClassifier::new(["pizza", "taco"]).with_top(1, 0.9);
//! let image = SyntheticImageBuilder::solid(32, 32, [200, 80, 10]);
//!
//! let prediction = predict(&classifier, &image.image).unwrap();
//! assert_eq!(prediction.label, "taco");
//! ```

mod artifact;
mod builders;
mod mocks;

pub use artifact::{write_model_artifact, FOOD_LABELS};
pub use builders::SyntheticImageBuilder;
pub use mocks::{
    counting_provider, MockClassifier, MockImageSource, MockProgressSink, MockResultOutput,
};
