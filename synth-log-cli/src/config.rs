//! Job configuration loading and parsing
//!
//! An extraction session is a list of jobs, one per logical event. Jobs come
//! either from a TOML configuration file or from the built-in default set of
//! production extractions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use synth_log_extractor::{ExtractionConfig, LogicalEvent};

/// Main application configuration (loaded from jobs.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Run-collection JSON file to extract from
    pub runs: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for feature-table files (default: next to the input file)
    pub output_dir: Option<PathBuf>,
    /// Pretty-print the feature-table JSON
    #[serde(default)]
    pub pretty: bool,
}

/// One extraction job: a logical event plus its invocation parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobConfig {
    pub event: LogicalEvent,
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// The built-in job set, matching the standard production extractions
pub fn default_jobs() -> Vec<JobConfig> {
    vec![
        JobConfig {
            event: LogicalEvent::Couple,
            extraction: ExtractionConfig::new()
                .with_span(3)
                .with_baseline(true)
                .with_skip_first_event(true),
        },
        JobConfig {
            event: LogicalEvent::Deprotect,
            extraction: ExtractionConfig::new()
                .with_span(3)
                .with_baseline(true)
                .with_skip_duplicates(true),
        },
        JobConfig {
            event: LogicalEvent::AminoFlow,
            extraction: ExtractionConfig::new().with_absolute(true),
        },
        JobConfig {
            event: LogicalEvent::ActivatorFlow,
            extraction: ExtractionConfig::new().with_absolute(true),
        },
        JobConfig {
            event: LogicalEvent::OutletFlow,
            extraction: ExtractionConfig::new()
                .with_baseline(true)
                .with_absolute(true),
        },
        JobConfig {
            event: LogicalEvent::OutletPressure,
            extraction: ExtractionConfig::new().with_baseline(true),
        },
    ]
}
