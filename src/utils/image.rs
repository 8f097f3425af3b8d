//! Utility functions for image file handling.
//!
//! This module provides functions for loading and saving images and for
//! discovering the supported image files in a directory. Images keep
//! their native color type on load so the pipeline can decide when to
//! convert to grayscale.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::core::{NormalizeError, NormalizeResult};

/// File extensions the batch processor picks up, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["bmp", "jpeg", "jpg", "png", "tif", "tiff"];

/// Returns true when the path carries a supported image extension.
///
/// The comparison is case-insensitive, so `SCAN.TIFF` is accepted.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Loads an image from a file path.
///
/// # Arguments
///
/// * `path` - The path of the image file to load
///
/// # Errors
///
/// Returns [`NormalizeError::ImageRead`] if the file cannot be opened
/// or decoded.
pub fn load_image(path: impl AsRef<Path>) -> NormalizeResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|e| NormalizeError::image_read(path, e))
}

/// Saves an image to a file path, with the format chosen from the
/// path's extension.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The destination path
///
/// # Errors
///
/// Returns [`NormalizeError::ImageWrite`] if the image cannot be
/// encoded or the file cannot be written.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> NormalizeResult<()> {
    let path = path.as_ref();
    image.save(path).map_err(|e| NormalizeError::image_write(path, e))
}

/// Lists the supported image files in a directory, sorted by path.
///
/// Subdirectories are not descended into, and entries without a
/// supported extension are skipped.
///
/// # Arguments
///
/// * `dir` - The directory to scan
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_image_files(dir: impl AsRef<Path>) -> NormalizeResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_supported_extension_detection() {
        assert!(is_supported_image(Path::new("page.png")));
        assert!(is_supported_image(Path::new("SCAN.TIFF")));
        assert!(is_supported_image(Path::new("photo.JPG")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("archive.pdf")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(12, 9, Luma([77])));
        save_image(&image, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (12, 9));
        assert_eq!(loaded.to_luma8(), image.to_luma8());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(dir.path().join("absent.png"));
        assert!(matches!(result, Err(NormalizeError::ImageRead { .. })));
    }

    #[test]
    fn test_save_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([0])));
        let result = save_image(&image, dir.path().join("page.xyz"));
        assert!(matches!(result, Err(NormalizeError::ImageWrite { .. })));
    }

    #[test]
    fn test_list_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let image = GrayImage::from_pixel(4, 4, Luma([128]));
        image.save(dir.path().join("b.png")).unwrap();
        image.save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }
}
