//! Image preprocessing for classification input.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]

use candle_core::{DType, Device, Tensor};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Converts an image into a `(1, 3, height, width)` tensor in `[0, 1]`.
///
/// The image is center-cropped to the target aspect ratio and scaled to the
/// target size, the same result as the cover-resize then center-crop the
/// classifier saw in training. No mean/std normalization is applied.
///
/// # Errors
///
/// Returns an error if tensor creation fails.
pub fn preprocess(
    image: &DynamicImage,
    height: usize,
    width: usize,
    device: &Device,
) -> candle_core::Result<Tensor> {
    let (width_px, height_px) = (width as u32, height as u32);
    let resized = center_crop_to_aspect(image, width_px, height_px).resize_exact(
        width_px,
        height_px,
        FilterType::Triangle,
    );
    let rgb = resized.to_rgb8().into_raw();

    let tensor = Tensor::from_vec(rgb, (height, width, 3), device)?
        .permute((2, 0, 1))?
        .to_dtype(DType::F32)?;

    (tensor / 255.0)?.unsqueeze(0)
}

/// Crops the largest centered region with the aspect ratio `width:height`.
///
/// Cropping before resizing keeps the intermediate buffer no larger than the
/// source, whatever its aspect ratio.
fn center_crop_to_aspect(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (src_w, src_h) = image.dimensions();
    if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
        return image.clone();
    }

    let (tw, th) = (u64::from(width), u64::from(height));
    let (sw, sh) = (u64::from(src_w), u64::from(src_h));

    let (crop_w, crop_h) = if sw * th > sh * tw {
        // Wider than the target: keep full height.
        let w = ((sh * tw + th / 2) / th).clamp(1, sw);
        (w as u32, src_h)
    } else {
        let h = ((sw * th + tw / 2) / tw).clamp(1, sh);
        (src_w, h as u32)
    };

    if (crop_w, crop_h) == (src_w, src_h) {
        return image.clone();
    }

    let x = (src_w - crop_w) / 2;
    let y = (src_h - crop_h) / 2;
    image.crop_imm(x, y, crop_w, crop_h)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_output_shape() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
        let tensor = preprocess(&image, 64, 64, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 64, 64]);
    }

    #[test]
    fn test_non_square_target() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        let tensor = preprocess(&image, 32, 48, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 32, 48]);
    }

    #[test]
    fn test_scales_to_unit_range_channel_first() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([255, 0, 51])));
        let tensor = preprocess(&image, 8, 8, &Device::Cpu).unwrap();

        let channels: Vec<f32> = tensor
            .squeeze(0)
            .unwrap()
            .mean((1, 2))
            .unwrap()
            .to_vec1()
            .unwrap();

        assert!((channels[0] - 1.0).abs() < 1e-4);
        assert!(channels[1].abs() < 1e-4);
        assert!((channels[2] - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_grayscale_input_is_expanded_to_rgb() {
        let image = DynamicImage::ImageLuma8(image::GrayImage::new(16, 16));
        let tensor = preprocess(&image, 16, 16, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims()[1], 3);
    }

    #[test]
    fn test_center_crop_keeps_middle() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }));

        let cropped = center_crop_to_aspect(&image, 64, 64);
        assert_eq!(cropped.dimensions(), (100, 100));
        assert!(cropped.to_rgb8().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_center_crop_matching_aspect_is_untouched() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(448, 224));
        assert_eq!(center_crop_to_aspect(&image, 64, 32).dimensions(), (448, 224));
    }

    #[test]
    fn test_extreme_aspect_strip() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 20_000, Rgb([10, 200, 30])));

        assert_eq!(center_crop_to_aspect(&image, 224, 224).dimensions(), (1, 1));

        let started = std::time::Instant::now();
        let tensor = preprocess(&image, 224, 224, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 224, 224]);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "took {:?}",
            started.elapsed()
        );
    }
}
