//! YOLOv8 classification model.
//!
//! Implements the Ultralytics `yolov8-cls` architecture: a `DarkNet`-style
//! backbone of strided convolutions and `C2f` blocks, followed by a
//! `Classify` head (1x1 conv, global average pool, linear, softmax).
//! Weight names follow the Ultralytics state dict, e.g.
//! `model.2.m.0.cv1.bn.running_mean` or `model.9.linear.weight`.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use std::sync::Arc;

use candle_core::{Device, Module, Tensor, D};
use candle_nn::{
    batch_norm, conv2d_no_bias, linear, BatchNorm, Conv2d, Conv2dConfig, Linear, VarBuilder,
};
use image::DynamicImage;
use tracing::debug;

use super::{preprocess, top1};
use crate::domain::{Classification, ModelMetadata, ModelScale};
use crate::error::{InferenceError, LoadError};
use crate::ports::Classifier;

/// Channels of the classification head's 1x1 convolution.
pub const HEAD_CHANNELS: usize = 1280;

/// `BatchNorm` epsilon used by Ultralytics.
const BN_EPS: f64 = 1e-3;

/// Backbone plan: `(base_channels, c2f_repeats)`; `None` is a stride-2 conv.
const BACKBONE: [(usize, Option<usize>); 9] = [
    (64, None),
    (128, None),
    (128, Some(3)),
    (256, None),
    (256, Some(6)),
    (512, None),
    (512, Some(6)),
    (1024, None),
    (1024, Some(3)),
];

/// Rounds up to the nearest multiple of `divisor`.
fn make_divisible(x: f64, divisor: usize) -> usize {
    (x / divisor as f64).ceil() as usize * divisor
}

/// Conv2d (no bias) + `BatchNorm` + `SiLU`.
#[derive(Debug)]
struct ConvBlock {
    conv: Conv2d,
    bn: BatchNorm,
}

impl ConvBlock {
    fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        vb: VarBuilder,
    ) -> candle_core::Result<Self> {
        let config = Conv2dConfig {
            padding: kernel_size / 2,
            stride,
            ..Conv2dConfig::default()
        };
        let conv = conv2d_no_bias(in_channels, out_channels, kernel_size, config, vb.pp("conv"))?;
        let bn = batch_norm(out_channels, BN_EPS, vb.pp("bn"))?;
        Ok(Self { conv, bn })
    }
}

impl Module for ConvBlock {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.conv.forward(xs)?;
        let xs = xs.apply_t(&self.bn, false)?;
        candle_nn::ops::silu(&xs)
    }
}

/// Two 3x3 convs with an optional residual connection.
#[derive(Debug)]
struct Bottleneck {
    cv1: ConvBlock,
    cv2: ConvBlock,
    residual: bool,
}

impl Bottleneck {
    fn new(
        in_channels: usize,
        out_channels: usize,
        shortcut: bool,
        vb: VarBuilder,
    ) -> candle_core::Result<Self> {
        let cv1 = ConvBlock::new(in_channels, out_channels, 3, 1, vb.pp("cv1"))?;
        let cv2 = ConvBlock::new(out_channels, out_channels, 3, 1, vb.pp("cv2"))?;
        Ok(Self {
            cv1,
            cv2,
            residual: shortcut && in_channels == out_channels,
        })
    }
}

impl Module for Bottleneck {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let ys = self.cv2.forward(&self.cv1.forward(xs)?)?;
        if self.residual {
            xs + ys
        } else {
            Ok(ys)
        }
    }
}

/// CSP bottleneck with two convolutions (`C2f`).
///
/// Splits the input in two halves, runs the bottlenecks on the second half
/// in sequence, and concatenates every intermediate output.
#[derive(Debug)]
struct C2f {
    cv1: ConvBlock,
    cv2: ConvBlock,
    bottlenecks: Vec<Bottleneck>,
}

impl C2f {
    fn new(
        in_channels: usize,
        out_channels: usize,
        repeats: usize,
        shortcut: bool,
        vb: VarBuilder,
    ) -> candle_core::Result<Self> {
        let hidden = out_channels / 2;
        let cv1 = ConvBlock::new(in_channels, 2 * hidden, 1, 1, vb.pp("cv1"))?;
        let cv2 = ConvBlock::new((2 + repeats) * hidden, out_channels, 1, 1, vb.pp("cv2"))?;
        let bottlenecks = (0..repeats)
            .map(|i| Bottleneck::new(hidden, hidden, shortcut, vb.pp(format!("m.{i}"))))
            .collect::<candle_core::Result<Vec<_>>>()?;
        Ok(Self {
            cv1,
            cv2,
            bottlenecks,
        })
    }
}

impl Module for C2f {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut ys = self.cv1.forward(xs)?.chunk(2, 1)?;
        for bottleneck in &self.bottlenecks {
            let next = match ys.last() {
                Some(prev) => bottleneck.forward(prev)?,
                None => candle_core::bail!("C2f split produced no chunks"),
            };
            ys.push(next);
        }
        self.cv2.forward(&Tensor::cat(&ys, 1)?)
    }
}

/// One backbone stage.
#[derive(Debug)]
enum Stage {
    Conv(ConvBlock),
    C2f(C2f),
}

impl Module for Stage {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Conv(block) => block.forward(xs),
            Self::C2f(block) => block.forward(xs),
        }
    }
}

/// `Classify` head: 1x1 conv, global average pool, linear, softmax.
#[derive(Debug)]
struct ClassifyHead {
    conv: ConvBlock,
    linear: Linear,
}

impl ClassifyHead {
    fn new(in_channels: usize, num_classes: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        let conv = ConvBlock::new(in_channels, HEAD_CHANNELS, 1, 1, vb.pp("conv"))?;
        let linear = linear(HEAD_CHANNELS, num_classes, vb.pp("linear"))?;
        Ok(Self { conv, linear })
    }
}

impl Module for ClassifyHead {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.conv.forward(xs)?;
        let xs = xs.mean((2, 3))?;
        let xs = self.linear.forward(&xs)?;
        candle_nn::ops::softmax(&xs, D::Minus1)
    }
}

/// YOLOv8 classification network.
///
/// Input: `(batch, 3, height, width)` in `[0, 1]`.
/// Output: `(batch, num_classes)` class probabilities.
#[derive(Debug)]
pub struct YoloV8Cls {
    backbone: Vec<Stage>,
    head: ClassifyHead,
}

impl YoloV8Cls {
    /// Builds the network for `scale` and `num_classes` from weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder, scale: ModelScale, num_classes: usize) -> candle_core::Result<Self> {
        let (depth, width, max_channels) = scale.multiples();
        let channels = |c: usize| make_divisible(c.min(max_channels) as f64 * width, 8);
        let repeats = |n: usize| ((n as f64 * depth).round() as usize).max(1);

        let vb = vb.pp("model");
        let mut in_channels = 3;
        let mut backbone = Vec::with_capacity(BACKBONE.len());

        for (index, (base, c2f_repeats)) in BACKBONE.iter().enumerate() {
            let out_channels = channels(*base);
            let stage = match c2f_repeats {
                None => Stage::Conv(ConvBlock::new(in_channels, out_channels, 3, 2, vb.pp(index))?),
                Some(n) => Stage::C2f(C2f::new(
                    in_channels,
                    out_channels,
                    repeats(*n),
                    true,
                    vb.pp(index),
                )?),
            };
            backbone.push(stage);
            in_channels = out_channels;
        }

        let head = ClassifyHead::new(in_channels, num_classes, vb.pp(BACKBONE.len()))?;
        debug!(
            "Built YOLOv8-cls ({scale:?}): {} stages, {} backbone channels, {num_classes} classes",
            backbone.len(),
            in_channels
        );

        Ok(Self { backbone, head })
    }
}

impl Module for YoloV8Cls {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut xs = xs.clone();
        for stage in &self.backbone {
            xs = stage.forward(&xs)?;
        }
        self.head.forward(&xs)
    }
}

/// [`Classifier`] backed by a [`YoloV8Cls`] network.
#[derive(Debug)]
pub struct YoloClassifier {
    model: YoloV8Cls,
    labels: Arc<[String]>,
    input_size: (usize, usize),
    device: Device,
}

impl YoloClassifier {
    /// Creates a classifier from weights and the artifact's metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata is invalid or the weights do not fit
    /// the network it describes.
    pub fn new(vb: VarBuilder, metadata: &ModelMetadata) -> Result<Self, LoadError> {
        metadata.validate()?;
        let device = vb.device().clone();
        let model = YoloV8Cls::new(vb, metadata.scale, metadata.num_classes())?;

        Ok(Self {
            model,
            labels: metadata.labels(),
            input_size: metadata.imgsz.height_width(),
            device,
        })
    }

    /// Runs the network and returns the full probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    pub fn probabilities(&self, image: &DynamicImage) -> Result<Vec<f32>, InferenceError> {
        let (height, width) = self.input_size;
        let input = preprocess(image, height, width, &self.device)?;
        let probs = self.model.forward(&input)?;
        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

impl Classifier for YoloClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, image: &DynamicImage) -> Result<Classification, InferenceError> {
        let probs = self.probabilities(image)?;
        let (top_index, top_confidence) =
            top1(&probs).ok_or_else(|| InferenceError::invalid_output("model returned no classes"))?;

        Ok(Classification {
            top_index,
            top_confidence,
            labels: Arc::clone(&self.labels),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::VarMap;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_make_divisible() {
        assert_eq!(make_divisible(16.0, 8), 16);
        assert_eq!(make_divisible(17.0, 8), 24);
        assert_eq!(make_divisible(1024.0 * 1.25, 8), 1280);
    }

    #[test]
    fn test_nano_scale_channels() {
        let (_, width, max_channels) = ModelScale::N.multiples();
        let widths: Vec<usize> = BACKBONE
            .iter()
            .map(|(c, _)| make_divisible((*c).min(max_channels) as f64 * width, 8))
            .collect();
        assert_eq!(widths, vec![16, 32, 32, 64, 64, 128, 128, 256, 256]);
    }

    #[test]
    fn test_zero_weights_give_uniform_distribution() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let model = YoloV8Cls::new(vb, ModelScale::N, 4).unwrap();

        let input = Tensor::zeros((1, 3, 32, 32), DType::F32, &Device::Cpu).unwrap();
        let probs: Vec<f32> = model
            .forward(&input)
            .unwrap()
            .squeeze(0)
            .unwrap()
            .to_vec1()
            .unwrap();

        assert_eq!(probs.len(), 4);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_weights_classify() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let metadata = ModelMetadata::new(ModelScale::N, 32, ["pizza", "ramen", "taco"]);
        let classifier = YoloClassifier::new(vb, &metadata).unwrap();

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 40, Rgb([200, 120, 40])));
        let probs = classifier.probabilities(&image).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-4);

        let classification = classifier.classify(&image).unwrap();
        assert!(classification.top_index < 3);
        assert!((0.0..=1.0).contains(&classification.top_confidence));
        assert_eq!(classifier.labels().len(), 3);
    }

    #[test]
    fn test_invalid_metadata_rejected() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let metadata = ModelMetadata::new(ModelScale::N, 32, Vec::<String>::new());
        assert!(matches!(
            YoloClassifier::new(vb, &metadata),
            Err(LoadError::InvalidMetadata { .. })
        ));
    }
}
