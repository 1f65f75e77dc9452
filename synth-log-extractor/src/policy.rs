//! Event-type policy table
//!
//! Static mapping from a requested logical event to the channel it is read
//! from, the event-log name it is searched under, and the tolerance buffer
//! applied when cutting the window. Some logical events are derived from the
//! span around a differently-named log entry (e.g. "Outlet Flow" windows are
//! anchored on "Couple" entries), which is why the search name can differ
//! from the logical name.
//!
//! This is pure data and must be reproduced exactly for compatibility with
//! historical feature tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical events the extractor knows how to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalEvent {
    Couple,
    Deprotect,
    #[serde(rename = "Amino Flow")]
    AminoFlow,
    #[serde(rename = "Activator Flow")]
    ActivatorFlow,
    #[serde(rename = "Outlet Flow")]
    OutletFlow,
    #[serde(rename = "Outlet Pressure")]
    OutletPressure,
}

/// Channel routing and search parameters for one logical event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPolicy {
    /// Channel family to read from (e.g. "uv", "flow", "pressure")
    pub family: &'static str,
    /// Sub-channel id within the family
    pub sub_channel: &'static str,
    /// Event-log name the matcher searches for
    pub search_name: &'static str,
    /// Tolerance buffer in samples on each side of the cut window
    pub buffer: usize,
}

impl LogicalEvent {
    /// All logical events, in the order they are conventionally processed
    pub const ALL: [LogicalEvent; 6] = [
        LogicalEvent::Couple,
        LogicalEvent::Deprotect,
        LogicalEvent::AminoFlow,
        LogicalEvent::ActivatorFlow,
        LogicalEvent::OutletFlow,
        LogicalEvent::OutletPressure,
    ];

    /// Resolve the static policy row for this logical event
    pub fn policy(self) -> EventPolicy {
        match self {
            LogicalEvent::Couple => EventPolicy {
                family: "uv",
                sub_channel: "uv310",
                search_name: "Couple",
                buffer: 0,
            },
            LogicalEvent::Deprotect => EventPolicy {
                family: "uv",
                sub_channel: "uv275",
                search_name: "Deprotect",
                buffer: 0,
            },
            LogicalEvent::AminoFlow => EventPolicy {
                family: "flow",
                sub_channel: "amino",
                search_name: "Deprotect Load",
                buffer: 0,
            },
            LogicalEvent::ActivatorFlow => EventPolicy {
                family: "flow",
                sub_channel: "activator",
                search_name: "Deprotect Load",
                buffer: 0,
            },
            LogicalEvent::OutletFlow => EventPolicy {
                family: "flow",
                sub_channel: "outlet",
                search_name: "Couple",
                buffer: 5,
            },
            LogicalEvent::OutletPressure => EventPolicy {
                family: "pressure",
                sub_channel: "pressure_out",
                search_name: "Couple",
                buffer: 5,
            },
        }
    }

    /// The logical event name as used at the API boundary
    pub fn name(self) -> &'static str {
        match self {
            LogicalEvent::Couple => "Couple",
            LogicalEvent::Deprotect => "Deprotect",
            LogicalEvent::AminoFlow => "Amino Flow",
            LogicalEvent::ActivatorFlow => "Activator Flow",
            LogicalEvent::OutletFlow => "Outlet Flow",
            LogicalEvent::OutletPressure => "Outlet Pressure",
        }
    }

    /// Parse a logical event from its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|event| event.name() == name)
    }
}

impl fmt::Display for LogicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
