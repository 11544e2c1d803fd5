//! Prediction adapter properties against a real network.

#![allow(clippy::unwrap_used)]

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use image::ImageFormat;
use whats_cooking_core::{
    predict, predict_bytes, Classifier, InferenceError, ModelMetadata, YoloClassifier,
};
use whats_cooking_core::domain::ModelScale;
use whats_cooking_test_support::{SyntheticImageBuilder, FOOD_LABELS};

fn random_classifier() -> YoloClassifier {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let metadata = ModelMetadata::new(ModelScale::N, 32, FOOD_LABELS.iter().copied());
    YoloClassifier::new(vb, &metadata).unwrap()
}

#[test]
fn test_any_image_yields_bounded_confidence_and_known_label() {
    let classifier = random_classifier();
    let images = [
        SyntheticImageBuilder::solid(64, 48, [250, 250, 250]),
        SyntheticImageBuilder::solid(7, 300, [0, 0, 0]),
        SyntheticImageBuilder::gradient(120, 80),
        SyntheticImageBuilder::checkerboard(33, 33, 4),
    ];

    for info in images {
        let prediction = predict(&classifier, &info.image).unwrap();
        assert!((0.0..=100.0).contains(&prediction.confidence));
        assert!(classifier.labels().contains(&prediction.label));
    }
}

#[test]
fn test_camera_capture_bytes() {
    let classifier = random_classifier();
    let capture = SyntheticImageBuilder::encode(
        &SyntheticImageBuilder::gradient(64, 64),
        ImageFormat::Jpeg,
    );
    let prediction = predict_bytes(&classifier, &capture).unwrap();
    assert!(FOOD_LABELS.contains(&prediction.label.as_str()));
}

#[test]
fn test_corrupt_bytes_are_inference_errors() {
    let classifier = random_classifier();
    let result = predict_bytes(&classifier, b"\x89PNG\r\n\x1a\nthis is not really a png");
    assert!(matches!(result, Err(InferenceError::Decode(_))));
}
