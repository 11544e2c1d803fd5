//! Synthetic image builders for testing.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use whats_cooking_core::ImageInfo;

/// Builder for creating synthetic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a single-color RGB image.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb(rgb));
        ImageInfo::new("synthetic://solid", DynamicImage::ImageRgb8(img))
    }

    /// Creates a red-to-blue horizontal gradient.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let t = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Rgb([u8::MAX - t, 64, t])
        });
        ImageInfo::new("synthetic://gradient", DynamicImage::ImageRgb8(img))
    }

    /// Creates a high-contrast checkerboard.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell_size = cell_size.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        ImageInfo::new("synthetic://checkerboard", DynamicImage::ImageRgb8(img))
    }

    /// Encodes an image into bytes, as a camera capture would arrive.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn encode(info: &ImageInfo, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        info.image
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode synthetic image");
        bytes
    }

    /// Saves an image to `path`; the format follows the extension.
    ///
    /// # Panics
    ///
    /// Panics if saving fails.
    #[allow(clippy::expect_used)]
    pub fn save(info: &ImageInfo, path: &Path) {
        info.image
            .to_rgb8()
            .save(path)
            .expect("save synthetic image");
    }
}
