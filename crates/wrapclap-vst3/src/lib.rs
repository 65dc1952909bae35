//! # wrapclap-vst3
//!
//! VST3 host bindings for the wrapclap process adapter.
//!
//! This crate reads a host's `ProcessData` through the `vst3` COM bindings
//! and feeds it to [`wrapclap_core::ProcessAdapter`]:
//!
//! - [`Vst3EventList`] - `IEventList` as a host event list
//! - [`Vst3ParameterChanges`] - `IParameterChanges` as host automation
//! - [`process`] - the body of `IAudioProcessor::process`
//! - [`Vst3Parameter`] - `ParameterInfo` and value conversion for
//!   `IEditController`

pub mod events;
pub mod parameter;
pub mod parameter_changes;
pub mod process;
pub mod util;

pub use events::{host_event, Vst3EventList};
pub use parameter::{parameter_info, Vst3Parameter};
pub use parameter_changes::{Vst3ParamQueue, Vst3ParameterChanges};
pub use process::{process, timeline_from_context};
pub use util::copy_wstring;

// Re-export the bindings so users don't need their own `vst3` dependency
pub use vst3;
