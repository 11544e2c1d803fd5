//! Integration tests for filesystem image loading.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use image::ImageFormat;
use whats_cooking_adapters::fs::load_image;
use whats_cooking_adapters::FsImageSource;
use whats_cooking_core::{ImageSource, InferenceError};
use whats_cooking_test_support::SyntheticImageBuilder;

fn write_photo(path: &std::path::Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    SyntheticImageBuilder::save(&SyntheticImageBuilder::solid(12, 8, [180, 90, 30]), path);
}

#[test]
fn test_load_formats() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["taco.jpeg", "soup.png", "cake.bmp", "pasta.tiff"] {
        let path = temp.path().join(name);
        write_photo(&path);

        let info = load_image(&path).expect("should load");
        assert_eq!((info.width, info.height), (12, 8));
        assert!(info.path.ends_with(name));
    }
}

#[test]
fn test_format_sniffed_from_content() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("actually-a-png.jpg");
    let bytes = SyntheticImageBuilder::encode(
        &SyntheticImageBuilder::checkerboard(16, 16, 4),
        ImageFormat::Png,
    );
    std::fs::write(&path, bytes).unwrap();

    let info = load_image(&path).expect("png bytes behind a jpg name");
    assert_eq!(info.width, 16);
}

#[test]
fn test_corrupt_file_is_decode_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.jpg");
    std::fs::write(&path, b"\xFF\xD8\xFF\xE0 truncated").unwrap();

    assert!(matches!(load_image(&path), Err(InferenceError::Decode(_))));
}

#[test]
fn test_directory_sorted_and_filtered() {
    let temp = tempfile::tempdir().unwrap();
    write_photo(&temp.path().join("c.jpg"));
    write_photo(&temp.path().join("a.png"));
    write_photo(&temp.path().join("b.jpeg"));
    std::fs::write(temp.path().join("recipe.txt"), "2 cups flour").unwrap();

    let source = FsImageSource::new(vec![temp.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(3));

    let names: Vec<String> = source
        .images()
        .map(|entry| {
            PathBuf::from(entry.path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, ["a.png", "b.jpeg", "c.jpg"]);
}

#[test]
fn test_directory_walked_once_per_source() {
    let temp = tempfile::tempdir().unwrap();
    write_photo(&temp.path().join("a.jpg"));
    write_photo(&temp.path().join("b.jpg"));

    let source = FsImageSource::new(vec![temp.path().to_path_buf()], false);
    assert_eq!(source.count_hint(), Some(2));

    // Added after the first walk, so not part of this source's listing.
    write_photo(&temp.path().join("c.jpg"));

    assert_eq!(source.images().count(), 2);
    assert_eq!(source.images().count(), 2);
    assert_eq!(source.count_hint(), Some(2));

    let fresh = FsImageSource::new(vec![temp.path().to_path_buf()], false);
    assert_eq!(fresh.images().count(), 3);
}

#[test]
fn test_recursion_is_opt_in() {
    let temp = tempfile::tempdir().unwrap();
    write_photo(&temp.path().join("top.jpg"));
    write_photo(&temp.path().join("desserts/cake.jpg"));
    write_photo(&temp.path().join("desserts/pies/apple.png"));

    let flat = FsImageSource::new(vec![temp.path().to_path_buf()], false);
    assert_eq!(flat.images().count(), 1);

    let deep = FsImageSource::new(vec![temp.path().to_path_buf()], true);
    let entries: Vec<_> = deep.images().collect();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|entry| entry.image.is_ok()));
}

#[test]
fn test_explicit_missing_file_kept_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let a = temp.path().join("a.jpg");
    let b = temp.path().join("b.jpg");
    write_photo(&a);
    write_photo(&b);
    let missing = temp.path().join("missing.jpg");

    let source = FsImageSource::new(vec![a, b, missing], false);
    let entries: Vec<_> = source.images().collect();

    assert_eq!(entries.len(), 3);
    assert!(entries[0].image.is_ok());
    assert!(entries[1].image.is_ok());
    assert!(entries[2].path.ends_with("missing.jpg"));
    assert!(matches!(entries[2].image, Err(InferenceError::Read { .. })));
}
