//! Classifier port implemented by inference backends.

use image::DynamicImage;

use crate::domain::Classification;
use crate::error::InferenceError;

/// A loaded image classification model.
pub trait Classifier: Send + Sync {
    /// The model's fixed label table, ordered by class index.
    fn labels(&self) -> &[String];

    /// Runs one inference pass and returns the top-1 class.
    ///
    /// Resizing and normalization are the implementation's concern; any
    /// decoded image is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails on this input.
    fn classify(&self, image: &DynamicImage) -> Result<Classification, InferenceError>;
}
