//! Progress reporting for batch runs.
//!
//! Batch drivers call a [`ProgressCallback`] from worker threads as each
//! file is processed. The CLI picks an implementation from the
//! [`OutputMode`]: a progress bar, one line per file, or nothing.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (progress bar and summary)
    #[default]
    Normal,
    /// Verbose output (one line per file)
    Verbose,
    /// Very verbose (per-file details)
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }

    /// Maximum tracing level for this mode
    pub fn log_level(&self) -> Level {
        match self {
            OutputMode::Quiet => Level::ERROR,
            OutputMode::Normal => Level::WARN,
            OutputMode::Verbose => Level::INFO,
            OutputMode::VeryVerbose => Level::DEBUG,
        }
    }
}

/// Per-file progress events; called concurrently from worker threads
pub trait ProgressCallback: Send + Sync {
    /// Total number of candidate files, called once before processing
    fn on_batch_start(&self, _total: usize) {}

    /// A file is about to be processed
    fn on_file_start(&self, _name: &str) {}

    /// A file was processed; `message` summarizes the outcome
    fn on_file_complete(&self, _name: &str, _message: &str) {}

    /// A file was skipped
    fn on_file_skipped(&self, _name: &str, _reason: &str) {}

    /// All files handled
    fn on_batch_finish(&self) {}
}

/// Progress callback that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {}

/// Line-oriented progress output
#[derive(Debug, Clone, Copy)]
pub struct LineProgress {
    mode: OutputMode,
}

impl LineProgress {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl ProgressCallback for LineProgress {
    fn on_file_start(&self, name: &str) {
        if self.mode.should_show(OutputMode::Verbose) {
            println!("Processing: {}", name);
        }
    }

    fn on_file_complete(&self, name: &str, message: &str) {
        if self.mode.should_show(OutputMode::VeryVerbose) {
            println!("  {} - {}", name, message);
        }
    }

    fn on_file_skipped(&self, name: &str, reason: &str) {
        if self.mode.should_show(OutputMode::Normal) {
            eprintln!("  - Error processing {}: {}", name, reason);
        }
    }
}

/// Progress bar template
const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}";

/// Progress bar backed by indicatif
#[derive(Clone)]
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    /// Files handled so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for BarProgress {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_file_start(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_file_complete(&self, _name: &str, _message: &str) {
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, name: &str, reason: &str) {
        self.bar
            .println(format!("  - Error processing {}: {}", name, reason));
        self.bar.inc(1);
    }

    fn on_batch_finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Print final summary
pub fn print_summary(title: &str, total_files: usize, ok_count: usize, skip_count: usize) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
    println!("  Total files:  {}", total_files);
    println!("  Succeeded:    {}", ok_count);
    println!("  Skipped:      {}", skip_count);
    println!("{}", "=".repeat(60));
    println!();
}
