//! Common types for the border module

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Border error types
#[derive(Debug, Error)]
pub enum BorderError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Failed to decode {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    #[error("Failed to encode {path}: {reason}")]
    EncodeFailed { path: PathBuf, reason: String },

    #[error("Invalid intensity grid: {0}")]
    InvalidGrid(String),

    #[error("Degenerate crop rectangle for {0}")]
    DegenerateCrop(PathBuf),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BorderError>;

/// One of the four image edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges in canonical report order
    pub fn all() -> [Edge; 4] {
        [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right]
    }

    /// Lowercase side name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    /// True for edges scanned row by row
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    /// True for edges where the walk starts at index 0
    pub fn is_leading(&self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-edge line counts measured inward from each edge
///
/// Each edge is measured on its own, so `top + bottom` may exceed the
/// image height (and `left + right` the width) for fully uniform images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeDepths {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl EdgeDepths {
    /// Same depth on every edge
    pub fn uniform(depth: u32) -> Self {
        Self {
            top: depth,
            bottom: depth,
            left: depth,
            right: depth,
        }
    }

    /// Depth for one edge
    pub fn get(&self, edge: Edge) -> u32 {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Set the depth for one edge
    pub fn set(&mut self, edge: Edge, depth: u32) {
        match edge {
            Edge::Top => self.top = depth,
            Edge::Bottom => self.bottom = depth,
            Edge::Left => self.left = depth,
            Edge::Right => self.right = depth,
        }
    }

    /// Build depths by evaluating `f` once per edge
    pub fn from_fn(mut f: impl FnMut(Edge) -> u32) -> Self {
        let mut depths = Self::default();
        for edge in Edge::all() {
            depths.set(edge, f(edge));
        }
        depths
    }
}

impl fmt::Display for EdgeDepths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={}, bottom={}, left={}, right={}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Crop region `[top, bottom) x [left, right)` in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRectangle {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropRectangle {
    /// Rectangle covering the whole image
    pub fn full(height: u32, width: u32) -> Self {
        Self {
            top: 0,
            bottom: height,
            left: 0,
            right: width,
        }
    }

    /// True when the rectangle has zero or negative area
    pub fn is_degenerate(&self) -> bool {
        self.top >= self.bottom || self.left >= self.right
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Clamp to the image extent and resolve inverted axes.
    ///
    /// An axis whose start is not below its end falls back to the full
    /// extent, so overlapping edge depths never crop into the image. Only
    /// a zero-sized image axis stays degenerate.
    pub fn reconciled(&self, height: u32, width: u32) -> Self {
        let (top, bottom) = reconcile_axis(self.top, self.bottom, height);
        let (left, right) = reconcile_axis(self.left, self.right, width);
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

fn reconcile_axis(start: u32, end: u32, extent: u32) -> (u32, u32) {
    let start = start.min(extent);
    let end = end.min(extent);
    if start < end {
        (start, end)
    } else {
        (0, extent)
    }
}

/// Detection outcome for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// File name without directory
    pub filename: String,
    /// Uniform depth of each edge
    pub depths: EdgeDepths,
    /// Sides whose depth exceeds the significance threshold, canonical order
    pub sides_with_border: Vec<Edge>,
}

impl ClassificationResult {
    /// Side names joined with `"; "`
    pub fn sides_label(&self) -> String {
        join_sides(&self.sides_with_border)
    }

    pub fn has_border(&self) -> bool {
        !self.sides_with_border.is_empty()
    }
}

/// Removal outcome for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalResult {
    /// File name without directory
    pub filename: String,
    /// Where the cropped image was written
    pub output_path: PathBuf,
    /// Lines removed from each edge
    pub removed: EdgeDepths,
    /// Rectangle that was kept
    pub crop: CropRectangle,
    /// Original (width, height)
    pub original_size: (u32, u32),
    /// Cropped (width, height)
    pub cropped_size: (u32, u32),
    /// Sides whose removed amount exceeds the significance threshold
    pub sides_removed: Vec<Edge>,
}

impl RemovalResult {
    /// One-line outcome naming the significantly cropped sides
    pub fn summary(&self) -> String {
        if self.sides_removed.is_empty() {
            "No significant borders removed".to_string()
        } else {
            let names: Vec<_> = self.sides_removed.iter().map(Edge::name).collect();
            format!("Removed borders: {}", names.join(", "))
        }
    }
}

/// A file the batch could not use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Join side names with the report separator
pub fn join_sides(sides: &[Edge]) -> String {
    sides
        .iter()
        .map(Edge::name)
        .collect::<Vec<_>>()
        .join("; ")
}
