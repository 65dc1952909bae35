//! Driving a CLAP plugin as the adapter's target.

use std::ptr;

use clap_sys::audio_buffer::clap_audio_buffer;
use clap_sys::plugin::clap_plugin;
use clap_sys::process::{
    clap_process, clap_process_status, CLAP_PROCESS_CONTINUE, CLAP_PROCESS_CONTINUE_IF_NOT_QUIET,
    CLAP_PROCESS_ERROR, CLAP_PROCESS_SLEEP, CLAP_PROCESS_TAIL,
};

use wrapclap_core::{
    AdapterConfig, AudioBuffer, EventSink, ProcessBlock, ProcessStatus, TargetPlugin, MAX_BUSES,
};

use crate::events::{input_events, output_events, ClapEvent};
use crate::transport::transport_event;

/// Map a CLAP process status. Unknown values count as errors.
pub fn status_from_clap(status: clap_process_status) -> ProcessStatus {
    match status {
        CLAP_PROCESS_CONTINUE => ProcessStatus::Continue,
        CLAP_PROCESS_CONTINUE_IF_NOT_QUIET => ProcessStatus::ContinueIfNotQuiet,
        CLAP_PROCESS_TAIL => ProcessStatus::Tail,
        CLAP_PROCESS_SLEEP => ProcessStatus::Sleep,
        CLAP_PROCESS_ERROR => ProcessStatus::Error,
        _ => ProcessStatus::Error,
    }
}

fn clap_buffer(buffer: &AudioBuffer) -> clap_audio_buffer {
    // clap-sys declares the channel table const; the plugin still writes
    // its output through it
    clap_audio_buffer {
        data32: buffer.data32 as *const *const f32,
        data64: ptr::null(),
        channel_count: buffer.channel_count,
        latency: buffer.latency,
        constant_mask: buffer.constant_mask,
    }
}

/// An activated CLAP plugin instance.
///
/// Holds the CLAP-layout copies of one block's events and buffer
/// descriptors, sized once in [`new`](Self::new).
pub struct ClapPlugin {
    plugin: *const clap_plugin,
    events: Vec<ClapEvent>,
    inputs: Vec<clap_audio_buffer>,
    outputs: Vec<clap_audio_buffer>,
}

// SAFETY: a CLAP plugin may be moved to the audio thread once activated; the
// instance is only ever used from one thread at a time.
unsafe impl Send for ClapPlugin {}

impl ClapPlugin {
    /// Wrap `plugin`, reserving storage for `config`. Returns `None` for null.
    ///
    /// # Safety
    /// `plugin` must be null or point to an activated `clap_plugin` that
    /// outlives the returned value.
    pub unsafe fn new(plugin: *const clap_plugin, config: &AdapterConfig) -> Option<Self> {
        if plugin.is_null() {
            return None;
        }
        Some(Self {
            plugin,
            events: Vec::with_capacity(config.input_event_capacity),
            inputs: Vec::with_capacity(MAX_BUSES),
            outputs: Vec::with_capacity(MAX_BUSES),
        })
    }

    /// Resize the event storage for a new configuration.
    ///
    /// Allocates; call only while the plugin is not processing.
    pub fn reserve(&mut self, config: &AdapterConfig) {
        self.events = Vec::with_capacity(config.input_event_capacity);
    }

    #[inline]
    pub fn as_ptr(&self) -> *const clap_plugin {
        self.plugin
    }
}

impl TargetPlugin for ClapPlugin {
    fn process(&mut self, block: &mut ProcessBlock<'_>) -> ProcessStatus {
        // SAFETY: `new` guarantees a live, non-null plugin.
        let Some(process_fn) = (unsafe { (*self.plugin).process }) else {
            return ProcessStatus::Error;
        };

        // Stay within the reserved capacity so nothing reallocates here
        self.events.clear();
        let count = (block.in_events.size() as usize).min(self.events.capacity());
        for index in 0..count {
            if let Some(event) = block.in_events.get(index as u32) {
                self.events.push(ClapEvent::from_converted(event));
            }
        }

        self.inputs.clear();
        self.inputs
            .extend(block.audio_inputs.iter().take(MAX_BUSES).map(clap_buffer));
        self.outputs.clear();
        self.outputs
            .extend(block.audio_outputs.iter().take(MAX_BUSES).map(clap_buffer));

        let transport = block.transport.map(transport_event);

        let events: &[ClapEvent] = &self.events;
        let in_events = input_events(&events);
        let sink: &dyn EventSink = block.out_events;
        let out_events = output_events(&sink);

        let process = clap_process {
            steady_time: block.steady_time,
            frames_count: block.frames_count,
            transport: transport.as_ref().map_or(ptr::null(), |t| t as *const _),
            audio_inputs: if self.inputs.is_empty() {
                ptr::null()
            } else {
                self.inputs.as_ptr()
            },
            audio_outputs: if self.outputs.is_empty() {
                ptr::null_mut()
            } else {
                self.outputs.as_mut_ptr()
            },
            audio_inputs_count: self.inputs.len() as u32,
            audio_outputs_count: self.outputs.len() as u32,
            in_events: &in_events,
            out_events: &out_events,
        };

        // SAFETY: every pointer in `process` refers to locals or fields that
        // outlive this call.
        let status = unsafe { process_fn(self.plugin, &process) };

        self.events.clear();
        status_from_clap(status)
    }
}
