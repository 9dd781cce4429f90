//! Image loading and input enumeration
//!
//! - `list_images`: candidate image files in a directory, sorted by name
//! - `load_image`: decode a file into its color image and intensity grid
//! - `save_image`: encode an image, picking the format from the extension

use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::border::{BorderError, IntensityGrid, Result};

/// Recognized image file extensions (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "tiff"];

/// Decoded image plus its grayscale grid
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub color: DynamicImage,
    pub grid: IntensityGrid,
}

impl LoadedImage {
    /// (width, height) of the color image
    pub fn dimensions(&self) -> (u32, u32) {
        (self.color.width(), self.color.height())
    }
}

/// Check whether a path carries a recognized image extension
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Collect image files directly inside `dir`
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Decode an image file
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    if !path.exists() {
        return Err(BorderError::ImageNotFound(path.to_path_buf()));
    }

    let color = image::open(path).map_err(|e| BorderError::DecodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let grid = IntensityGrid::from_image(&color);

    Ok(LoadedImage { color, grid })
}

/// Encode `img` to `path`.
///
/// JPEG and BMP cannot carry alpha or 16-bit samples, so those outputs are
/// written as 8-bit RGB.
pub fn save_image(img: &DynamicImage, path: &Path) -> Result<()> {
    let needs_rgb8 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ["jpg", "jpeg", "bmp"].iter().any(|f| ext.eq_ignore_ascii_case(f)));

    let result = if needs_rgb8 && !matches!(img, DynamicImage::ImageRgb8(_)) {
        DynamicImage::ImageRgb8(img.to_rgb8()).save(path)
    } else {
        img.save(path)
    };

    result.map_err(|e| BorderError::EncodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// File name component as a string, for reports
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
