//! Error types for adapter setup.
//!
//! Only the non-real-time setup phase reports errors. The per-block path
//! degrades every anomaly to "event omitted this block" instead.

use std::fmt;

use crate::types::ParameterId;

/// Errors raised while building descriptors or configuring the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// A parameter range is empty, inverted or not finite.
    InvalidRange {
        id: ParameterId,
        min: f64,
        max: f64,
    },
    /// An event buffer capacity is zero or above the supported limit.
    InvalidEventCapacity { requested: usize, max: usize },
    /// A channel count exceeds the supported limit.
    TooManyChannels { requested: usize, max: usize },
    /// Two parameters share the same identifier.
    DuplicateParameter { id: ParameterId },
    /// The target plugin does not provide a required extension.
    MissingExtension(&'static str),
    /// No target plugin instance was supplied.
    NullPlugin,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { id, min, max } => {
                write!(f, "Parameter {} has an invalid range [{}, {}]", id, min, max)
            }
            Self::InvalidEventCapacity { requested, max } => write!(
                f,
                "Event capacity {} is out of range (1..={})",
                requested, max
            ),
            Self::TooManyChannels { requested, max } => {
                write!(f, "Channel count {} exceeds the limit of {}", requested, max)
            }
            Self::DuplicateParameter { id } => write!(f, "Duplicate parameter id {}", id),
            Self::MissingExtension(name) => write!(f, "Plugin does not implement {}", name),
            Self::NullPlugin => write!(f, "Plugin instance is null"),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Result type for adapter setup operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
