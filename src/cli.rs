//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::progress::OutputMode;
use crate::report::ReportFormat;

/// Process exit codes
pub mod exit_codes {
    /// Batch completed (including batches with nothing to process)
    pub const SUCCESS: i32 = 0;
    /// Unexpected failure (I/O, report write)
    pub const GENERAL_ERROR: i32 = 1;
    /// Config file missing or invalid
    pub const INVALID_CONFIG: i32 = 2;
}

/// Detect and remove uniform borders from images
#[derive(Debug, Parser)]
#[command(name = "borderscan", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report which edges of each image carry a uniform border
    Detect(DetectArgs),
    /// Crop uniform borders and write cleaned images
    Remove(RemoveArgs),
    /// Show version, defaults and config file locations
    Info,
}

/// Options shared by every batch command
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Input directory [default: input]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Config file (default: ./borderscan.toml or user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker threads (default: all CPUs)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// List the files that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v per file, -vv details)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CommonArgs {
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::from_verbosity(self.verbose)
        }
    }
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report file [default: border_detection_report.csv]
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<ReportFormat>,
}

impl DetectArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            input_dir: self.common.input.clone(),
            report_path: self.report.clone(),
            report_format: self.format,
            threads: self.common.threads,
            ..CliOverrides::new()
        }
    }
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output directory for cropped images [default: output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RemoveArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            input_dir: self.common.input.clone(),
            output_dir: self.output.clone(),
            threads: self.common.threads,
            ..CliOverrides::new()
        }
    }
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_detect_defaults() {
        let cli = Cli::try_parse_from(["borderscan", "detect"]).unwrap();
        match cli.command {
            Commands::Detect(args) => {
                assert!(args.common.input.is_none());
                assert!(args.report.is_none());
                assert_eq!(args.common.output_mode(), OutputMode::Normal);
                let overrides = args.overrides();
                assert!(overrides.input_dir.is_none());
            }
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_parse_detect_options() {
        let cli = Cli::try_parse_from([
            "borderscan", "detect", "-i", "scans", "--report", "r.json", "--format", "json",
            "-j", "3", "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Detect(args) => {
                let overrides = args.overrides();
                assert_eq!(overrides.input_dir, Some(PathBuf::from("scans")));
                assert_eq!(overrides.report_path, Some(PathBuf::from("r.json")));
                assert_eq!(overrides.report_format, Some(ReportFormat::Json));
                assert_eq!(overrides.threads, Some(3));
                assert_eq!(args.common.output_mode(), OutputMode::VeryVerbose);
            }
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_parse_remove_options() {
        let cli =
            Cli::try_parse_from(["borderscan", "remove", "--output", "clean", "-q"]).unwrap();
        match cli.command {
            Commands::Remove(args) => {
                assert_eq!(args.overrides().output_dir, Some(PathBuf::from("clean")));
                assert_eq!(args.common.output_mode(), OutputMode::Quiet);
            }
            _ => panic!("expected remove"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["borderscan", "detect", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Cli::try_parse_from(["borderscan", "detect", "--format", "xml"]);
        assert!(result.is_err());
    }
}
