//! Decoded image types.

use image::{DynamicImage, GenericImageView};

use crate::error::InferenceError;

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path (or pseudo-path such as `stdin`) of the image.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }

    /// Decodes an encoded byte stream (JPEG, PNG, ...).
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Decode`] if the bytes are not a supported image.
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Result<Self, InferenceError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(path, image))
    }
}

/// One entry yielded by an image source.
///
/// The path is always known, even when loading failed, so failures can be
/// reported against the file the user asked for.
#[derive(Debug)]
pub struct SourcedImage {
    /// Requested path.
    pub path: String,
    /// The decoded image, or why it could not be produced.
    pub image: Result<ImageInfo, InferenceError>,
}
