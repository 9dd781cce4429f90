//! borderscan - uniform border detection and removal for images
//!
//! Scanned pages and photographed documents often carry a solid frame:
//! the scanner bed, letterboxing, a mat. This crate measures how many
//! uniform rows/columns sit on each edge and either reports them or crops
//! them away.
//!
//! # Modules
//!
//! - [`border`] - intensity grid, edge scanner, result types
//! - [`loader`] - image decoding and input enumeration
//! - [`report`] - CSV / JSON detection reports
//! - [`batch`] - parallel directory processing
//! - [`config`] - batch configuration and config files
//! - [`progress`] - progress callbacks
//! - [`cli`] - command-line definitions

pub mod batch;
pub mod border;
pub mod cli;
pub mod config;
pub mod loader;
pub mod progress;
pub mod report;

// Re-export public API
pub use batch::{BatchProcessor, DetectionBatch, RemovalBatch};
pub use border::{
    BorderError, ClassificationResult, CropRectangle, Edge, EdgeBorderScanner, EdgeDepths,
    IntensityGrid, RemovalResult, ScanOptions, ScanOptionsBuilder, SkippedFile, CROP_MARGIN,
    SIGNIFICANCE_THRESHOLD, UNIFORMITY_THRESHOLD,
};
pub use cli::{exit_codes, Cli, Commands, CommonArgs, DetectArgs, RemoveArgs};
pub use config::{BatchConfig, CliOverrides, Config, ConfigError};
pub use loader::{list_images, load_image, save_image, LoadedImage, IMAGE_EXTENSIONS};
pub use progress::{BarProgress, LineProgress, NoProgress, OutputMode, ProgressCallback};
pub use report::{write_report, ReportFormat};
