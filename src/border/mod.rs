//! Border Detection & Removal module
//!
//! Detects uniform-color borders (letterboxing, scanner bed, mat) along
//! the four edges of an image and computes the crop that removes them.
//!
//! # Features
//!
//! - Per-edge uniform depth measured with a line standard deviation test
//! - Classification of significant borders
//! - Crop rectangles that keep a safety margin next to the content
//! - Reconciliation of overlapping edge depths
//!
//! # Example
//!
//! ```rust,no_run
//! use borderscan::{EdgeBorderScanner, IntensityGrid, ScanOptions};
//!
//! let img = image::open("page.png").unwrap();
//! let grid = IntensityGrid::from_image(&img);
//!
//! let scanner = EdgeBorderScanner::new(ScanOptions::default());
//! let depths = scanner.detect(&grid);
//!
//! println!("Borders: {}", depths);
//! println!("Significant: {:?}", scanner.classify(&depths));
//! ```

mod grid;
mod scan;
mod types;

// Re-export public API
pub use grid::IntensityGrid;
pub use scan::EdgeBorderScanner;
pub use types::{
    join_sides, BorderError, ClassificationResult, CropRectangle, Edge, EdgeDepths,
    RemovalResult, Result, SkippedFile,
};

// ============================================================
// Constants
// ============================================================

/// Standard deviation below which a row/column counts as uniform
pub const UNIFORMITY_THRESHOLD: f64 = 10.0;

/// Depth a border must exceed to be reported
pub const SIGNIFICANCE_THRESHOLD: u32 = 5;

/// Border lines kept next to the content when cropping
pub const CROP_MARGIN: u32 = 5;

// ============================================================
// Options
// ============================================================

/// Edge scan options
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Line standard deviation separating uniform from content
    pub uniformity_threshold: f64,
    /// Minimum depth (exclusive) for a side to be reported
    pub significance_threshold: u32,
    /// Lines of border retained beside content when cropping
    pub crop_margin: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            uniformity_threshold: UNIFORMITY_THRESHOLD,
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            crop_margin: CROP_MARGIN,
        }
    }
}

impl ScanOptions {
    /// Create a new options builder
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::default()
    }
}

/// Builder for ScanOptions
#[derive(Debug, Default)]
pub struct ScanOptionsBuilder {
    options: ScanOptions,
}

impl ScanOptionsBuilder {
    /// Set the uniformity threshold (negative values clamp to 0)
    #[must_use]
    pub fn uniformity_threshold(mut self, threshold: f64) -> Self {
        self.options.uniformity_threshold = threshold.max(0.0);
        self
    }

    /// Set the significance threshold
    #[must_use]
    pub fn significance_threshold(mut self, depth: u32) -> Self {
        self.options.significance_threshold = depth;
        self
    }

    /// Set the crop margin
    #[must_use]
    pub fn crop_margin(mut self, margin: u32) -> Self {
        self.options.crop_margin = margin;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ScanOptions {
        self.options
    }
}
