//! Run-collection loading
//!
//! Reads the run-collection JSON file produced by the acquisition step: a
//! single object mapping run identifier to run record. The mapping carries no
//! reliable ordering, so runs are sorted by start time before extraction.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use synth_log_extractor::{Extractor, RunRecord};

/// Load a run-collection file and return an extractor over it
pub fn load_runs(path: &Path) -> Result<Extractor> {
    if !path.exists() {
        bail!("Run collection file not found: {:?}", path);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read run collection file: {:?}", path))?;

    let runs: HashMap<String, RunRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse run collection file: {:?}", path))?;

    log::info!("Loaded {} runs from {:?}", runs.len(), path);
    Ok(Extractor::from_map(runs))
}
