//! Image source port for loading images from various sources.

use crate::domain::SourcedImage;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// Every requested image yields an entry; failures to load are carried
    /// in [`SourcedImage::image`] rather than dropped.
    fn images(&self) -> Box<dyn Iterator<Item = SourcedImage> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
