//! # wrapclap-clap
//!
//! CLAP target bindings for the wrapclap process adapter.
//!
//! - [`ClapPlugin`] - drives a `clap_plugin` as a [`wrapclap_core::TargetPlugin`]
//! - [`ClapEvent`] - converted events in CLAP layout, served through
//!   `clap_input_events`
//! - [`transport_event`] - `clap_event_transport` from a transport snapshot
//! - [`read_parameters`] / [`descriptor_from_clap_info`] - parameter import
//!   through the `clap.params` extension

pub mod events;
pub mod params;
pub mod plugin;
pub mod transport;
pub mod util;

pub use events::{input_events, output_events, ClapEvent};
pub use params::{descriptor_from_clap_info, read_parameters};
pub use plugin::{status_from_clap, ClapPlugin};
pub use transport::transport_event;

// Re-export the bindings so users don't need their own `clap-sys` dependency
pub use clap_sys;
