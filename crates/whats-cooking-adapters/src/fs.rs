//! Filesystem adapter for loading images.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};
use whats_cooking_core::{ImageInfo, ImageSource, InferenceError, SourcedImage};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff", "tif"];

/// Filesystem image source adapter.
///
/// Files named explicitly always produce an entry, so a missing file is
/// reported rather than silently dropped. Directories are expanded to the
/// supported images they contain. The tree is walked once per source; the
/// file list is reused by later calls.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
    files: OnceCell<Vec<PathBuf>>,
}

impl FsImageSource {
    /// Creates a new filesystem image source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            paths,
            recursive,
            files: OnceCell::new(),
        }
    }

    fn files(&self) -> &[PathBuf] {
        self.files.get_or_init(|| {
            let files = self.collect_files();
            debug!("Found {} image files", files.len());
            files
        })
    }

    /// Collects all image files from the configured paths.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_dir() {
                let mut found = Vec::new();
                self.collect_from_dir(path, &mut found);
                found.sort();
                files.extend(found);
            } else {
                if path.is_file() && !is_supported_image(path) {
                    warn!("Unsupported file type: {}", path.display());
                }
                files.push(path.clone());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourcedImage> + Send + '_> {
        Box::new(self.files().iter().map(|path| SourcedImage {
            path: path.to_string_lossy().into_owned(),
            image: load_image(path),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.files().len())
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Reads and decodes an image from the filesystem.
///
/// The format is sniffed from the content, not the extension.
///
/// # Errors
///
/// Returns [`InferenceError::Read`] if the file cannot be read and
/// [`InferenceError::Decode`] if it is not a supported image.
pub fn load_image(path: &Path) -> Result<ImageInfo, InferenceError> {
    let bytes = std::fs::read(path).map_err(|source| InferenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    ImageInfo::from_bytes(path.to_string_lossy(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("taco.jpeg")));
        assert!(is_supported_image(Path::new("cake.JPG")));
        assert!(is_supported_image(Path::new("soup.png")));
        assert!(is_supported_image(Path::new("pasta.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("taco")));
    }

    #[test]
    fn test_missing_file_yields_read_error() {
        let source = FsImageSource::new(vec![PathBuf::from("/nonexistent/missing.jpg")], false);
        let entries: Vec<_> = source.images().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/nonexistent/missing.jpg");
        assert!(matches!(entries[0].image, Err(InferenceError::Read { .. })));
    }
}
