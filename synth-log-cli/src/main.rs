//! Synth Log CLI Application
//!
//! This is the command-line interface for the synth log feature extractor.
//! It uses the synth-log-extractor library and adds:
//! - Run-collection file loading and start-time ordering
//! - Job configuration (built-in production set or TOML file)
//! - Parallel execution of independent extraction jobs
//! - Feature-table JSON output and summary reporting

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod loader;
mod report;

use config::JobConfig;
use synth_log_extractor::{Extraction, LogicalEvent};

/// Synth Log Extractor - peak features from synthesizer run logs
#[derive(Parser, Debug)]
#[command(name = "synth-log-cli")]
#[command(about = "Extract peak features from synthesizer run logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the run-collection JSON file
    #[arg(short, long, value_name = "FILE")]
    runs: Option<PathBuf>,

    /// Restrict extraction to one logical event (e.g. "Outlet Flow")
    #[arg(short, long, value_name = "NAME")]
    event: Option<String>,

    /// Output directory for feature tables (default: next to the input file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to a job configuration file (jobs.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print feature-table JSON
    #[arg(long)]
    pretty: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Synth Log CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using extractor library v{}", synth_log_extractor::VERSION);

    if let Some(config_path) = &args.config {
        config_mode(config_path, &args)
    } else if let Some(runs_path) = &args.runs {
        simple_mode(runs_path, &args)
    } else {
        // No arguments - show help
        println!("Synth Log Extractor - No input specified");
        println!("\nQuick Start:");
        println!("  synth-log-cli --runs health_synth.json");
        println!("  synth-log-cli --runs health_synth.json --event \"Outlet Flow\"");
        println!("\nFor explicit job parameters:");
        println!("  synth-log-cli --config jobs.toml");
        println!("\nUse --help for more options");
        Ok(())
    }
}

/// Simple mode - run the built-in production job set against one file
fn simple_mode(runs_path: &Path, args: &Args) -> Result<()> {
    let jobs = filter_jobs(config::default_jobs(), args.event.as_deref())?;
    let output_dir = resolve_output_dir(args.output.as_deref(), runs_path);

    run_session(runs_path, &jobs, &output_dir, args.pretty)
}

/// Config mode - jobs and paths from a TOML file, flags may override
fn config_mode(config_path: &Path, args: &Args) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let app_config = config::load_config(config_path)?;
    log::debug!("Configuration loaded successfully");

    let runs_path = args.runs.clone().unwrap_or(app_config.input.runs);

    let jobs = if app_config.jobs.is_empty() {
        config::default_jobs()
    } else {
        app_config.jobs
    };
    let jobs = filter_jobs(jobs, args.event.as_deref())?;

    let output_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => match app_config.output.output_dir {
            Some(dir) => dir,
            None => resolve_output_dir(None, &runs_path),
        },
    };

    run_session(
        &runs_path,
        &jobs,
        &output_dir,
        args.pretty || app_config.output.pretty,
    )
}

/// Execute a job list against one run collection and write the results
fn run_session(
    runs_path: &Path,
    jobs: &[JobConfig],
    output_dir: &Path,
    pretty: bool,
) -> Result<()> {
    println!("═══════════════════════════════════════════════");
    println!("  Synth Log Extractor");
    println!("═══════════════════════════════════════════════\n");

    let extractor = loader::load_runs(runs_path)?;
    println!(
        "Loaded {} runs from {:?} ({} jobs)",
        extractor.num_runs(),
        runs_path,
        jobs.len()
    );

    let stem = runs_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("features");

    // Jobs are independent: each reads the shared immutable run collection
    // and builds its own table, so they can run on the rayon pool
    let results: Vec<(LogicalEvent, Extraction)> = jobs
        .par_iter()
        .map(|job| (job.event, extractor.extract(job.event, &job.extraction)))
        .collect();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut session = Vec::with_capacity(results.len());
    for (event, extraction) in results {
        let path = output_dir.join(format!("{}{}.json", stem, event.name()));
        let json = if pretty {
            extraction.table.to_json_pretty()
        } else {
            extraction.table.to_json()
        };
        let json = json
            .with_context(|| format!("Failed to serialize feature table for '{}'", event))?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write feature table: {:?}", path))?;
        log::info!("Wrote feature table: {:?}", path);
        session.push((event, extraction, Some(path)));
    }

    report::print_session(&session);
    Ok(())
}

/// Restrict a job list to one logical event if requested
fn filter_jobs(jobs: Vec<JobConfig>, event_name: Option<&str>) -> Result<Vec<JobConfig>> {
    let Some(name) = event_name else {
        return Ok(jobs);
    };

    let Some(event) = LogicalEvent::from_name(name) else {
        bail!(
            "Unknown logical event '{}' (expected one of: {})",
            name,
            LogicalEvent::ALL.map(|e| e.name()).join(", ")
        );
    };

    let jobs: Vec<JobConfig> = jobs.into_iter().filter(|job| job.event == event).collect();
    if jobs.is_empty() {
        bail!("No configured job for logical event '{}'", event);
    }
    Ok(jobs)
}

/// Default output directory: alongside the input file
fn resolve_output_dir(requested: Option<&Path>, runs_path: &Path) -> PathBuf {
    if let Some(dir) = requested {
        return dir.to_path_buf();
    }
    match runs_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
