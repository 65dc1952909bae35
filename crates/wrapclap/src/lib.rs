//! # wrapclap
//!
//! Host a CLAP plugin behind a VST3 processing call.
//!
//! ## Architecture
//!
//! ```text
//! VST3 host (ProcessData)
//!        ↓
//! wrapclap-vst3 (host event list, parameter changes, timeline)
//!        ↓
//! ProcessAdapter (transport, event conversion, ordering)
//!        ↓
//! wrapclap-clap (clap_process, input/output event lists)
//!        ↓
//! CLAP plugin
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wrapclap::prelude::*;
//!
//! // In setupProcessing, with an activated clap_plugin:
//! let mut bridge = unsafe { Bridge::new(plugin, AdapterConfig::new(0, 2)) }?;
//!
//! // In IAudioProcessor::process:
//! unsafe { bridge.process(data) }
//! ```

// Re-export sub-crates
pub use wrapclap_core as core;
#[cfg(feature = "clap")]
pub use wrapclap_clap as clap_impl;
#[cfg(feature = "vst3")]
pub use wrapclap_vst3 as vst3_impl;

#[cfg(all(feature = "vst3", feature = "clap"))]
mod bridge;

#[cfg(all(feature = "vst3", feature = "clap"))]
pub use bridge::Bridge;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use wrapclap::prelude::*;
/// ```
pub mod prelude {
    pub use wrapclap_core::{
        // Setup
        AdapterConfig, AdapterError, AdapterResult,
        // Parameters
        Cookie, ParameterDescriptor, ParameterFlags, ParameterId, ParameterList,
        ParameterRegistry, ParameterValue,
        // Events
        ConvertedEvent, EventFlags, EventKind, EventSink, EventSource,
        // Processing
        HostBlock, ProcessAdapter, ProcessBlock, ProcessStatus, TargetPlugin,
        TransportSnapshot,
    };

    #[cfg(feature = "clap")]
    pub use wrapclap_clap::{read_parameters, ClapPlugin};

    #[cfg(feature = "vst3")]
    pub use wrapclap_vst3::{Vst3EventList, Vst3Parameter, Vst3ParameterChanges};

    #[cfg(all(feature = "vst3", feature = "clap"))]
    pub use crate::Bridge;
}
