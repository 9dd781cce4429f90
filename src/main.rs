//! borderscan - uniform border detection and removal
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use borderscan::{
    exit_codes,
    // CLI
    Cli, Commands, CommonArgs, DetectArgs, RemoveArgs,
    // Config
    BatchConfig, CliOverrides, Config, ConfigError,
    // Processing
    BatchProcessor, ScanOptions,
    // Progress
    BarProgress, LineProgress, NoProgress, OutputMode, ProgressCallback,
    // Report
    write_report, IMAGE_EXTENSIONS,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Remove(args) => run_remove(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ConfigError>().is_some() {
                exit_codes::INVALID_CONFIG
            } else {
                exit_codes::GENERAL_ERROR
            }
        }
    });
}

// ============ Setup ============

fn init_logging(mode: OutputMode) {
    tracing_subscriber::fmt()
        .with_max_level(mode.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the batch config: defaults, then config file, then CLI flags
fn resolve_config(common: &CommonArgs, overrides: &CliOverrides) -> anyhow::Result<BatchConfig> {
    let file_config = match &common.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(file_config.merge_with_cli(overrides))
}

fn progress_for(mode: OutputMode) -> Box<dyn ProgressCallback> {
    match mode {
        OutputMode::Quiet => Box::new(NoProgress),
        OutputMode::Normal => Box::new(BarProgress::new()),
        OutputMode::Verbose | OutputMode::VeryVerbose => Box::new(LineProgress::new(mode)),
    }
}

fn print_banner(title: &str) {
    println!("{}", title);
    println!("{}", "=".repeat(30));
}

// ============ Detect Command ============

fn run_detect(args: &DetectArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let mode = args.common.output_mode();
    init_logging(mode);

    let config = resolve_config(&args.common, &args.overrides())?;
    let processor = BatchProcessor::new(config.clone(), ScanOptions::default());

    if args.common.dry_run {
        print_execution_plan("detect", &processor);
        return Ok(());
    }

    let show = mode.should_show(OutputMode::Normal);
    if show {
        print_banner("Border Detection");
    }

    let progress = progress_for(mode);
    let batch = processor
        .detect_batch(progress.as_ref())
        .with_context(|| format!("detection failed in {}", config.input_dir.display()))?;

    if batch.results.is_empty() {
        if show {
            println!("No images found or processed!");
        }
        return Ok(());
    }

    write_report(&batch.results, &config.report_path, config.report_format)
        .with_context(|| format!("failed to write {}", config.report_path.display()))?;

    if show {
        println!("Results saved to {}", config.report_path.display());
        println!();
        println!("Processed {} images", batch.results.len());
        for result in &batch.results {
            let sides = if result.has_border() {
                result.sides_label()
            } else {
                "No borders".to_string()
            };
            println!("{}: {}", result.filename, sides);
        }
        borderscan::progress::print_summary(
            "Detection Summary",
            batch.total_files,
            batch.results.len(),
            batch.skipped.len(),
        );
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

// ============ Remove Command ============

fn run_remove(args: &RemoveArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let mode = args.common.output_mode();
    init_logging(mode);

    let config = resolve_config(&args.common, &args.overrides())?;
    let processor = BatchProcessor::new(config.clone(), ScanOptions::default());

    if args.common.dry_run {
        print_execution_plan("remove", &processor);
        return Ok(());
    }

    let show = mode.should_show(OutputMode::Normal);
    if show {
        print_banner("Border Removal");
    }

    let progress = progress_for(mode);
    let batch = processor
        .remove_batch(progress.as_ref())
        .with_context(|| format!("removal failed in {}", config.input_dir.display()))?;

    if batch.results.is_empty() {
        if show {
            println!("No images found or processed!");
        }
        return Ok(());
    }

    if show {
        for result in &batch.results {
            println!("{}: {}", result.filename, result.summary());
            if mode.should_show(OutputMode::Verbose) {
                println!("  - Removed: {}", result.removed);
                println!("  - Saved to: {}", result.output_path.display());
            }
        }
        println!();
        println!("Successfully processed {} images", batch.results.len());
        println!(
            "Cropped images saved to '{}' folder",
            config.output_dir.display()
        );
        borderscan::progress::print_summary(
            "Removal Summary",
            batch.total_files,
            batch.results.len(),
            batch.skipped.len(),
        );
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}

// ============ Helper Functions ============

/// Print execution plan for dry-run mode
fn print_execution_plan(command: &str, processor: &BatchProcessor) {
    let config = processor.config();
    println!("=== Dry Run - Execution Plan ({}) ===", command);
    println!();
    println!("Input: {}", config.input_dir.display());
    if command == "remove" {
        println!("Output: {}", config.output_dir.display());
    } else {
        println!(
            "Report: {} ({})",
            config.report_path.display(),
            config.report_format
        );
    }
    println!(
        "Threads: {}",
        config.threads.unwrap_or_else(num_cpus::get)
    );
    println!();

    let files: Vec<PathBuf> = if config.input_dir.is_dir() {
        match processor.candidate_files() {
            Ok(files) => files,
            Err(e) => {
                println!("Cannot list input directory: {}", e);
                return;
            }
        }
    } else {
        println!("Input directory does not exist yet; it will be created.");
        Vec::new()
    };

    println!("Files to process: {}", files.len());
    for (i, file) in files.iter().enumerate() {
        println!("  {}. {}", i + 1, borderscan::loader::file_name_of(file));
    }
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    let defaults = BatchConfig::default();
    let scan = ScanOptions::default();

    println!("borderscan v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Defaults:");
    println!("  Input dir:   {}", defaults.input_dir.display());
    println!("  Output dir:  {}", defaults.output_dir.display());
    println!("  Report:      {}", defaults.report_path.display());
    println!("  Extensions:  {}", IMAGE_EXTENSIONS.join(", "));

    println!();
    println!("Scan Thresholds:");
    println!("  Uniformity (std dev): {}", scan.uniformity_threshold);
    println!("  Significance:         {}", scan.significance_threshold);
    println!("  Crop margin:          {}", scan.crop_margin);

    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let state = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), state);
    }

    Ok(())
}
