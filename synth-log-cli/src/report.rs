//! Per-job summary reporting
//!
//! Renders the matched/skipped/dropped accounting of each extraction job for
//! the terminal. Feature tables themselves go to JSON files; this module only
//! covers the human-facing summary.

use std::path::Path;
use synth_log_extractor::{Extraction, LogicalEvent};

/// One-line summary for a finished job
pub fn job_line(event: LogicalEvent, extraction: &Extraction) -> String {
    format!(
        "{:<16} {:>5} features | {}",
        event.name(),
        extraction.table.len(),
        extraction.summary
    )
}

/// Print the report for a whole session
pub fn print_session(results: &[(LogicalEvent, Extraction, Option<std::path::PathBuf>)]) {
    println!("\n📊 Extraction Summary:");
    println!("───────────────────────────────────────────────");
    for (event, extraction, output) in results {
        println!("  {}", job_line(*event, extraction));
        for failure in &extraction.summary.run_failures {
            println!("    ⚠ run {}: {}", failure.uuid, failure.reason);
        }
        if let Some(path) = output {
            println!("    → {}", display_path(path));
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
