//! Prediction adapter: classifier output to `(label, confidence%)`.

use image::DynamicImage;
use tracing::debug;

use crate::domain::{Classification, ImageInfo, Prediction};
use crate::error::InferenceError;
use crate::ports::Classifier;

/// Runs one inference pass and returns the single best guess.
///
/// # Errors
///
/// Returns an error if inference fails or the classifier's output breaks the
/// top-1 contract (index outside the label table, score outside `[0, 1]`).
pub fn predict(
    classifier: &dyn Classifier,
    image: &DynamicImage,
) -> Result<Prediction, InferenceError> {
    let classification = classifier.classify(image)?;
    let prediction = to_prediction(&classification)?;
    debug!(
        "Top-1: {} (index {}, score {:.4})",
        prediction.label, classification.top_index, classification.top_confidence
    );
    Ok(prediction)
}

/// Decodes an encoded image (e.g. a camera capture) and predicts on it.
///
/// # Errors
///
/// Returns [`InferenceError::Decode`] if the bytes are not a supported
/// image, otherwise as [`predict`].
pub fn predict_bytes(classifier: &dyn Classifier, bytes: &[u8]) -> Result<Prediction, InferenceError> {
    let info = ImageInfo::from_bytes("bytes", bytes)?;
    predict(classifier, &info.image)
}

fn to_prediction(classification: &Classification) -> Result<Prediction, InferenceError> {
    let score = classification.top_confidence;
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(InferenceError::invalid_output(format!(
            "confidence {score} is not a probability"
        )));
    }

    let label = classification
        .labels
        .get(classification.top_index)
        .ok_or_else(|| {
            InferenceError::invalid_output(format!(
                "class index {} out of range for {} labels",
                classification.top_index,
                classification.labels.len()
            ))
        })?;

    Ok(Prediction::from_score(label.clone(), score))
}
