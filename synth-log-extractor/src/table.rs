//! Columnar feature table
//!
//! The output of one extraction call: every field is an ordered column and
//! record `i` is reconstructable by taking index `i` from every column. The
//! table serializes to JSON with RFC 3339 timestamps and round-trips to a
//! structurally identical table.

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// One extracted feature occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// Half-height width x half-height amplitude of the dominant peak
    pub value: f64,
    /// Absolute timestamp of the peak center
    pub time: Timestamp,
    /// Owning run identifier
    pub uuid: String,
    /// Amino-acid label for chemistry-linked events, else empty
    pub key: String,
    /// 1-based occurrence counter within the run (skipped occurrences excluded)
    pub step: u32,
    /// Display tag derived from the run identifier, metadata only
    pub color: String,
    /// Globally unique 0-based sequence number across the whole output
    pub index: u64,
}

/// Index-aligned columns of feature records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub value: Vec<f64>,
    pub time: Vec<Timestamp>,
    pub uuid: Vec<String>,
    pub key: Vec<String>,
    pub step: Vec<u32>,
    pub color: Vec<String>,
    pub index: Vec<u64>,
}

impl FeatureTable {
    /// Create a new empty feature table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record, keeping all columns aligned
    pub fn push(&mut self, record: FeatureRecord) {
        self.value.push(record.value);
        self.time.push(record.time);
        self.uuid.push(record.uuid);
        self.key.push(record.key);
        self.step.push(record.step);
        self.color.push(record.color);
        self.index.push(record.index);
    }

    /// Number of records in the table
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// True if the table holds no records (a valid, non-error outcome)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Reconstruct record `i` from the columns
    pub fn record(&self, i: usize) -> Option<FeatureRecord> {
        if i >= self.len() {
            return None;
        }
        Some(FeatureRecord {
            value: self.value[i],
            time: self.time[i],
            uuid: self.uuid[i].clone(),
            key: self.key[i].clone(),
            step: self.step[i],
            color: self.color[i].clone(),
            index: self.index[i],
        })
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to human-readable JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a table previously produced by `to_json`
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
