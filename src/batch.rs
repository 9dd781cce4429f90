//! Batch driver
//!
//! Runs detection or removal over every image in the input directory.
//! Images are independent, so they are processed in parallel with rayon;
//! results keep the sorted enumeration order. Files that cannot be decoded
//! or cropped are skipped and listed, never aborting the batch.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::border::{
    BorderError, ClassificationResult, EdgeBorderScanner, EdgeDepths, RemovalResult, Result,
    ScanOptions, SkippedFile,
};
use crate::config::BatchConfig;
use crate::loader::{file_name_of, list_images, load_image, save_image};
use crate::progress::ProgressCallback;

/// Outcome of a detection run
#[derive(Debug, Clone, Default)]
pub struct DetectionBatch {
    /// Candidate files found in the input directory
    pub total_files: usize,
    /// One result per decoded image
    pub results: Vec<ClassificationResult>,
    /// Files that could not be processed
    pub skipped: Vec<SkippedFile>,
}

/// Outcome of a removal run
#[derive(Debug, Clone, Default)]
pub struct RemovalBatch {
    /// Candidate files found in the input directory
    pub total_files: usize,
    /// One result per image written to the output directory
    pub results: Vec<RemovalResult>,
    /// Files that could not be processed
    pub skipped: Vec<SkippedFile>,
}

/// Directory-level border processing
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BatchConfig,
    scanner: EdgeBorderScanner,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig, options: ScanOptions) -> Self {
        Self {
            config,
            scanner: EdgeBorderScanner::new(options),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Candidate images in the input directory
    pub fn candidate_files(&self) -> Result<Vec<PathBuf>> {
        list_images(&self.config.input_dir)
    }

    /// Detect borders in a single image
    pub fn detect_file(&self, path: &Path) -> Result<ClassificationResult> {
        let loaded = load_image(path)?;
        let depths = self.scanner.detect(&loaded.grid);
        let sides_with_border = self.scanner.classify(&depths);
        debug!(file = %path.display(), %depths, "detected");

        Ok(ClassificationResult {
            filename: file_name_of(path),
            depths,
            sides_with_border,
        })
    }

    /// Crop the borders of a single image into `output_dir`
    pub fn remove_file(&self, path: &Path, output_dir: &Path) -> Result<RemovalResult> {
        let loaded = load_image(path)?;
        let (width, height) = loaded.dimensions();

        let removed = self.scanner.removal_depths(&loaded.grid);
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, height, width)
            .reconciled(height, width);
        if rect.is_degenerate() {
            return Err(BorderError::DegenerateCrop(path.to_path_buf()));
        }

        // amounts actually applied after reconciliation
        let applied = EdgeDepths {
            top: rect.top,
            bottom: height - rect.bottom,
            left: rect.left,
            right: width - rect.right,
        };

        let cropped = loaded
            .color
            .crop_imm(rect.left, rect.top, rect.width(), rect.height());
        let filename = file_name_of(path);
        let output_path = output_dir.join(&filename);
        save_image(&cropped, &output_path)?;
        debug!(file = %path.display(), removed = %applied, "cropped");

        Ok(RemovalResult {
            filename,
            output_path,
            sides_removed: self.scanner.classify(&applied),
            removed: applied,
            crop: rect,
            original_size: (width, height),
            cropped_size: (cropped.width(), cropped.height()),
        })
    }

    /// Detect borders in every image of the input directory
    pub fn detect_batch(&self, progress: &dyn ProgressCallback) -> Result<DetectionBatch> {
        fs::create_dir_all(&self.config.input_dir)?;
        let files = self.candidate_files()?;
        info!(
            input = %self.config.input_dir.display(),
            files = files.len(),
            "starting border detection"
        );

        let (results, skipped) = self.run_each(&files, progress, |path| {
            let result = self.detect_file(path)?;
            let message = if result.has_border() {
                format!("Borders detected: {}", result.sides_label().replace("; ", ", "))
            } else {
                "Borders detected: None".to_string()
            };
            Ok((result, message))
        })?;

        info!(processed = results.len(), skipped = skipped.len(), "detection finished");
        Ok(DetectionBatch {
            total_files: files.len(),
            results,
            skipped,
        })
    }

    /// Crop every image of the input directory into the output directory
    pub fn remove_batch(&self, progress: &dyn ProgressCallback) -> Result<RemovalBatch> {
        fs::create_dir_all(&self.config.input_dir)?;
        fs::create_dir_all(&self.config.output_dir)?;
        let files = self.candidate_files()?;
        info!(
            input = %self.config.input_dir.display(),
            output = %self.config.output_dir.display(),
            files = files.len(),
            "starting border removal"
        );

        let output_dir = self.config.output_dir.as_path();
        let (results, skipped) = self.run_each(&files, progress, |path| {
            let result = self.remove_file(path, output_dir)?;
            let message = format!("{} ({})", result.summary(), result.removed);
            Ok((result, message))
        })?;

        info!(processed = results.len(), skipped = skipped.len(), "removal finished");
        Ok(RemovalBatch {
            total_files: files.len(),
            results,
            skipped,
        })
    }

    /// Apply `job` to every file in parallel, splitting successes from skips
    fn run_each<T, F>(
        &self,
        files: &[PathBuf],
        progress: &dyn ProgressCallback,
        job: F,
    ) -> Result<(Vec<T>, Vec<SkippedFile>)>
    where
        T: Send,
        F: Fn(&Path) -> Result<(T, String)> + Sync,
    {
        progress.on_batch_start(files.len());

        let run = || {
            files
                .par_iter()
                .map(|path| {
                    let name = file_name_of(path);
                    progress.on_file_start(&name);
                    match job(path) {
                        Ok((value, message)) => {
                            progress.on_file_complete(&name, &message);
                            Ok(value)
                        }
                        Err(e) => {
                            warn!(file = %path.display(), error = %e, "skipping file");
                            progress.on_file_skipped(&name, &e.to_string());
                            Err(SkippedFile {
                                path: path.clone(),
                                reason: e.to_string(),
                            })
                        }
                    }
                })
                .collect::<Vec<_>>()
        };

        let outcomes = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| BorderError::ThreadPool(e.to_string()))?
                .install(run),
            None => run(),
        };
        progress.on_batch_finish();

        let mut values = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(value) => values.push(value),
                Err(skip) => skipped.push(skip),
            }
        }
        Ok((values, skipped))
    }
}
