//! # wrapclap-core
//!
//! Protocol-neutral core of the wrapclap process adapter.
//!
//! A VST3 host calls `process` with a block of audio, its timeline, note and
//! sysex events, and parameter automation. A CLAP plugin expects its own
//! transport, a single time-ordered input event list, and an output event
//! sink. This crate performs that translation without knowing either ABI:
//! host data arrives through the traits in [`host`], the target is driven
//! through [`TargetPlugin`].
//!
//! ## Main Types
//!
//! - [`ProcessAdapter`] - Per-block translation and target invocation
//! - [`ParameterDescriptor`] - Identity and range mapping of one control
//! - [`ParameterRegistry`] / [`ParameterList`] - Id-to-descriptor lookup
//! - [`ConvertedEvent`] - Tagged event handed to the target
//! - [`EventQueue`] - Fixed-capacity, time-ordered event buffer
//! - [`TransportSnapshot`] - Timeline state in the target's representation
//! - [`AdapterConfig`] - Channel counts and buffer capacities
//! - [`AdapterError`] - Setup-phase errors
//!
//! ## Real-time Contract
//!
//! [`ProcessAdapter::configure`] allocates and may log; it runs while audio
//! is stopped. [`ProcessAdapter::process`] and everything it calls never
//! allocates, locks or logs.

pub mod adapter;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod parameter;
pub mod queue;
pub mod registry;
pub mod target;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use adapter::{convert_automation, convert_event, ProcessAdapter, STEADY_TIME_UNKNOWN};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use event::{
    ConvertedEvent, EventFlags, EventHeader, EventKind, NoteEvent, ParamValueEvent, SysExEvent,
};
pub use host::{
    EmptyQueue, HostAudioBus, HostBlock, HostEvent, HostEventData, HostEventList, HostNote,
    HostParameterChanges, HostParameterQueue, HostPoint, HostTimeline, HostTransportState,
    NoEvents, NoParameterChanges, DATA_TYPE_MIDI_SYSEX,
};
pub use parameter::{ParameterDescriptor, ParameterFlags};
pub use queue::EventQueue;
pub use registry::{ParameterList, ParameterRegistry};
pub use target::{
    AudioBuffer, DiscardingSink, EmittedEvent, EventSink, EventSource, ProcessBlock,
    ProcessStatus, TargetPlugin,
};
pub use transport::{beat_time, TransportFlags, TransportSnapshot, BEAT_TIME_SCALE};
pub use types::{
    BeatTime, Cookie, ParameterId, ParameterValue, SecTime, DEFAULT_EVENT_CAPACITY,
    MAX_BUSES, MAX_CHANNELS, MAX_EVENT_CAPACITY, NOTE_ID_ANY, NOT_APPLICABLE,
};
