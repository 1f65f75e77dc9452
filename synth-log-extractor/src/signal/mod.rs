//! Signal processing primitives (windowing, peak analysis)
//!
//! This module contains the two numeric building blocks of the extractor:
//! cutting an event-aligned window out of a channel time series, and reducing
//! a window to its dominant half-height peak.

pub mod peaks;
pub mod window;

// Re-export the primitives used by the matcher
pub use peaks::dominant_peak;
pub use window::cut_section;
