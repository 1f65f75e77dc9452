//! Core types for the feature extraction library
//!
//! This module defines the run-record input model the extractor consumes and
//! the error taxonomy it emits. Run records are read-only inputs: the
//! extractor never mutates them, it only reads channel windows out of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp type used throughout the extractor
pub type Timestamp = DateTime<Utc>;

/// Result type for extractor operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during feature extraction
///
/// `EmptyAxis`, `EventIndexOutOfRange` and `NoPeakFound` are recoverable at
/// the occurrence level: the matcher drops the single occurrence and keeps
/// walking the run's event log. `MalformedRun` is fatal for that run only.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("time axis is empty or has no usable samples")]
    EmptyAxis,

    #[error("event index {index} plus span {span} exceeds event log length {len}")]
    EventIndexOutOfRange {
        index: usize,
        span: usize,
        len: usize,
    },

    #[error("no interior local maximum in a window of {0} samples")]
    NoPeakFound(usize),

    #[error("malformed run {uuid}: {reason}")]
    MalformedRun { uuid: String, reason: String },
}

/// One manufacturing run: channel time series, event log and peptide metadata
///
/// All sub-channel sequences are index-aligned with the shared `time` axis.
/// Gaps in a sequence are `None` and are filtered out when a window is cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Absolute start of the run, the reference clock for all relative times
    pub start_time: Timestamp,
    /// Shared relative time axis in seconds, may contain gaps
    pub time: Vec<Option<f64>>,
    /// Channel family (e.g. "uv", "flow") -> sub-channel id -> samples
    #[serde(default)]
    pub channels: HashMap<String, HashMap<String, Vec<Option<f64>>>>,
    /// Ordered event log entries
    #[serde(default)]
    pub event_log: Vec<EventEntry>,
    /// Synthesized peptide, indexed 1-based by event `ia` references
    #[serde(default)]
    pub peptide: Peptide,
}

/// A single event-log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    /// Event name as logged by the machine (e.g. "Couple", "Deprotect Load")
    pub name: String,
    /// Event time relative to the run start, in seconds
    pub time: f64,
    /// Optional event metadata
    #[serde(default)]
    pub kwargs: EventKwargs,
}

/// Event metadata carried in the log
///
/// `id` counts repeated sub-events at the same station; `ia` is a 1-based
/// index into the peptide residue list for chemistry-linked events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventKwargs {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub ia: Option<usize>,
}

/// The peptide being synthesized in a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Peptide {
    #[serde(default)]
    pub aminos: Vec<AminoResidue>,
}

/// One residue of the peptide chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoResidue {
    /// Amino-acid label (e.g. a two-letter code)
    pub aa: String,
}

impl RunRecord {
    /// Look up the sample sequence for a channel family / sub-channel pair
    pub fn channel_samples(&self, family: &str, sub_channel: &str) -> Option<&[Option<f64>]> {
        self.channels
            .get(family)
            .and_then(|group| group.get(sub_channel))
            .map(|samples| samples.as_slice())
    }

    /// Resolve a 1-based `ia` reference to the residue label
    pub fn amino_label(&self, ia: usize) -> Option<&str> {
        if ia == 0 {
            return None;
        }
        self.peptide.aminos.get(ia - 1).map(|residue| residue.aa.as_str())
    }
}
