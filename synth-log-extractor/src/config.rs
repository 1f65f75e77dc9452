//! Extraction configuration types
//!
//! The per-invocation parameters for one logical-event extraction. Channel
//! routing and search-name remapping are not configured here - they are fixed
//! policy data (see the `policy` module).

use serde::{Deserialize, Serialize};

/// Parameters for one logical-event extraction call
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Number of consecutive event-log entries one occurrence covers
    #[serde(default = "default_span")]
    pub span: usize,

    /// Subtract the window minimum before peak extraction
    #[serde(default)]
    pub baseline: bool,

    /// Consume the first matching occurrence per run without recording it
    #[serde(default)]
    pub skip_first_event: bool,

    /// Discard occurrences whose `kwargs.id >= 2` (repeated sub-events)
    #[serde(default)]
    pub skip_duplicates: bool,

    /// Apply element-wise absolute value before the baseline transform
    #[serde(default)]
    pub absolute: bool,
}

fn default_span() -> usize {
    1
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            span: default_span(),
            baseline: false,
            skip_first_event: false,
            skip_duplicates: false,
            absolute: false,
        }
    }
}

impl ExtractionConfig {
    /// Create a new extraction configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the event span
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Builder method: enable or disable baseline subtraction
    pub fn with_baseline(mut self, enabled: bool) -> Self {
        self.baseline = enabled;
        self
    }

    /// Builder method: enable or disable skipping the first occurrence
    pub fn with_skip_first_event(mut self, enabled: bool) -> Self {
        self.skip_first_event = enabled;
        self
    }

    /// Builder method: enable or disable duplicate skipping
    pub fn with_skip_duplicates(mut self, enabled: bool) -> Self {
        self.skip_duplicates = enabled;
        self
    }

    /// Builder method: enable or disable the absolute-value transform
    pub fn with_absolute(mut self, enabled: bool) -> Self {
        self.absolute = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExtractionConfig::new()
            .with_span(3)
            .with_baseline(true)
            .with_skip_first_event(true);

        assert_eq!(config.span, 3);
        assert!(config.baseline);
        assert!(config.skip_first_event);
        assert!(!config.skip_duplicates);
        assert!(!config.absolute);
    }

    #[test]
    fn test_config_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.span, 1);
        assert!(!config.baseline);
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let config: ExtractionConfig = serde_json::from_str(r#"{ "baseline": true }"#).unwrap();
        assert_eq!(config.span, 1);
        assert!(config.baseline);
        assert!(!config.absolute);
    }
}
