//! Adapter configuration.
//!
//! [`AdapterConfig`] carries everything the setup phase needs to size the
//! adapter's buffers. It is validated once in
//! [`ProcessAdapter::configure`](crate::adapter::ProcessAdapter::configure);
//! the audio thread never sees an invalid configuration.
//!
//! # Example
//!
//! ```
//! use wrapclap_core::AdapterConfig;
//!
//! let config = AdapterConfig::new(0, 2).with_input_event_capacity(512);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{AdapterError, AdapterResult};
use crate::types::{DEFAULT_EVENT_CAPACITY, MAX_CHANNELS, MAX_EVENT_CAPACITY};

/// Channel counts and event buffer capacities for one processing setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Number of host input channels. Recorded, not forwarded to the target.
    pub input_channels: usize,
    /// Number of host output channels.
    pub output_channels: usize,
    /// Maximum number of converted input events per block.
    pub input_event_capacity: usize,
    /// Limit for target-emitted events per block, reserved for a sink that
    /// stores events. The discarding sink keeps nothing, so this is only
    /// validated.
    pub output_event_capacity: usize,
}

impl AdapterConfig {
    /// Create a configuration with default event capacities.
    pub const fn new(input_channels: usize, output_channels: usize) -> Self {
        Self {
            input_channels,
            output_channels,
            input_event_capacity: DEFAULT_EVENT_CAPACITY,
            output_event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Set the input event capacity.
    pub const fn with_input_event_capacity(mut self, capacity: usize) -> Self {
        self.input_event_capacity = capacity;
        self
    }

    /// Set the output event capacity.
    pub const fn with_output_event_capacity(mut self, capacity: usize) -> Self {
        self.output_event_capacity = capacity;
        self
    }

    /// Check channel counts and capacities against the supported limits.
    pub fn validate(&self) -> AdapterResult<()> {
        for channels in [self.input_channels, self.output_channels] {
            if channels > MAX_CHANNELS {
                return Err(AdapterError::TooManyChannels {
                    requested: channels,
                    max: MAX_CHANNELS,
                });
            }
        }
        for capacity in [self.input_event_capacity, self.output_event_capacity] {
            if capacity == 0 || capacity > MAX_EVENT_CAPACITY {
                return Err(AdapterError::InvalidEventCapacity {
                    requested: capacity,
                    max: MAX_EVENT_CAPACITY,
                });
            }
        }
        Ok(())
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::new(0, 2)
    }
}
