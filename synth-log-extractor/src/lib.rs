//! Synth Log Extractor Library
//!
//! A stateless, reusable library for extracting peak features from
//! multi-channel synthesizer run logs. Each run records continuous channel
//! readings (UV absorbance, flow rates, pressures) interleaved with a named
//! event log; for every occurrence of a requested logical event the extractor
//! cuts the matching channel window, finds the dominant pulse, and reduces it
//! to one scalar feature (half-height width x half-height amplitude) plus
//! timing and chemistry metadata.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on extraction:
//! - Walks per-run event logs and matches entries by resolved search name
//! - Cuts event-aligned channel windows with a per-event tolerance buffer
//! - Reduces each window to its dominant half-height peak
//! - Assembles an ordered, columnar feature table plus a summary
//!
//! The library does NOT:
//! - Fetch run data from the manufacturing API
//! - Cache raw or derived results on disk
//! - Render plots or regroup results for display
//!
//! All higher-level functionality is in the application layer (synth-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use synth_log_extractor::{ExtractionConfig, Extractor, LogicalEvent};
//! use std::collections::HashMap;
//!
//! // Run records come from an external collection step
//! let runs: HashMap<String, synth_log_extractor::RunRecord> = HashMap::new();
//!
//! // Runs are ordered oldest-started first for reproducible output
//! let extractor = Extractor::from_map(runs);
//!
//! let config = ExtractionConfig::new()
//!     .with_span(3)
//!     .with_baseline(true)
//!     .with_skip_first_event(true);
//!
//! let extraction = extractor.extract(LogicalEvent::Couple, &config);
//! println!("{} features ({})", extraction.table.len(), extraction.summary);
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod policy;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use config::ExtractionConfig;
pub use extractor::{Extraction, ExtractionSummary, Extractor, RunFailure};
pub use policy::{EventPolicy, LogicalEvent};
pub use table::{FeatureRecord, FeatureTable};
pub use types::{
    AminoResidue, EventEntry, EventKwargs, ExtractError, Peptide, Result, RunRecord, Timestamp,
};

// Internal modules (not exposed in public API)
mod signal;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create an extractor over no runs
        let extractor = Extractor::new(Vec::new());
        assert_eq!(extractor.num_runs(), 0);

        let extraction = extractor.extract(LogicalEvent::Couple, &ExtractionConfig::new());
        assert!(extraction.table.is_empty());
    }
}
