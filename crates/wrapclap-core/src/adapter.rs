//! The per-block process adapter.
//!
//! [`ProcessAdapter`] owns the scratch state for one plugin instance and
//! translates each host processing call into a single target call:
//!
//! 1. translate the host timeline into a [`TransportSnapshot`]
//! 2. point the target's output buffer at the host's channels (no copy)
//! 3. drain host note and sysex events, then the last automation point of
//!    each changed parameter, into the [`EventQueue`]
//! 4. order the queue by timestamp, ties keeping arrival order
//! 5. run the target, which pulls events through [`EventSource`]
//! 6. clear the queue so nothing borrowed from the host outlives the call
//!
//! Steps 1 to 6 never allocate, lock or log. Malformed host data degrades to
//! "event omitted this block".
//!
//! [`EventSource`]: crate::target::EventSource

use std::sync::Arc;

use crate::config::AdapterConfig;
use crate::error::AdapterResult;
use crate::event::{
    ConvertedEvent, EventFlags, EventHeader, EventKind, NoteEvent, ParamValueEvent, SysExEvent,
};
use crate::host::{
    HostBlock, HostEvent, HostEventData, HostEventList, HostParameterChanges,
    HostParameterQueue, DATA_TYPE_MIDI_SYSEX,
};
use crate::queue::{BlockScope, EventQueue};
use crate::registry::{ParameterList, ParameterRegistry};
use crate::target::{AudioBuffer, DiscardingSink, ProcessBlock, ProcessStatus, TargetPlugin};
use crate::transport::TransportSnapshot;
use crate::types::NOT_APPLICABLE;

/// Steady time reported to the target when the host supplies no timeline.
pub const STEADY_TIME_UNKNOWN: i64 = -1;

/// Translates host processing calls into target processing calls.
///
/// Configure it once with [`configure`](Self::configure) while audio is
/// stopped, then call [`process`](Self::process) once per block on the audio
/// thread.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wrapclap_core::{
///     AdapterConfig, HostBlock, ParameterList, ProcessAdapter, ProcessBlock, ProcessStatus,
///     TargetPlugin,
/// };
///
/// struct Silence;
///
/// impl TargetPlugin for Silence {
///     fn process(&mut self, block: &mut ProcessBlock<'_>) -> ProcessStatus {
///         assert_eq!(block.in_events.size(), 0);
///         ProcessStatus::Continue
///     }
/// }
///
/// let mut adapter = ProcessAdapter::new();
/// adapter
///     .configure(AdapterConfig::default(), Arc::new(ParameterList::new()))
///     .unwrap();
///
/// let status = adapter.process(&HostBlock::new(64), &mut Silence);
/// assert_eq!(status, ProcessStatus::Continue);
/// ```
#[derive(Debug)]
pub struct ProcessAdapter<R: ParameterRegistry = ParameterList> {
    config: AdapterConfig,
    registry: Option<Arc<R>>,
    queue: EventQueue,
    sink: DiscardingSink,
    transport: TransportSnapshot,
    outputs: [AudioBuffer; 1],
    /// Overflow state of the last processed block
    overflowed: bool,
}

impl<R: ParameterRegistry> Default for ProcessAdapter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ParameterRegistry> ProcessAdapter<R> {
    /// Create an unconfigured adapter. [`process`](Self::process) reports
    /// [`ProcessStatus::Error`] until [`configure`](Self::configure) succeeds.
    pub fn new() -> Self {
        Self {
            config: AdapterConfig::default(),
            registry: None,
            queue: EventQueue::default(),
            sink: DiscardingSink::new(),
            transport: TransportSnapshot::default(),
            outputs: [AudioBuffer::empty()],
            overflowed: false,
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Size the buffers for `config` and install the parameter registry.
    ///
    /// Allocates. Call only while the audio thread is not processing. On
    /// error the previous configuration stays in effect.
    pub fn configure(&mut self, config: AdapterConfig, registry: Arc<R>) -> AdapterResult<()> {
        if let Err(err) = config.validate() {
            log::warn!("Rejected adapter configuration {:?}: {}", config, err);
            return Err(err);
        }

        self.queue.reserve(config.input_event_capacity);
        self.sink.reset();
        self.outputs = [AudioBuffer::empty()];
        self.overflowed = false;
        self.config = config;
        self.registry = Some(registry);

        log::debug!(
            "Adapter configured: {} in / {} out channels, event capacity {} in / {} out",
            config.input_channels,
            config.output_channels,
            config.input_event_capacity,
            config.output_event_capacity
        );
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.registry.is_some()
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Run one block of the target against host data.
    ///
    /// Real-time safe: performs no allocation, locking or logging.
    pub fn process<E, P, T>(&mut self, block: &HostBlock<'_, E, P>, target: &mut T) -> ProcessStatus
    where
        E: HostEventList,
        P: HostParameterChanges,
        T: TargetPlugin + ?Sized,
    {
        let Some(registry) = self.registry.as_deref() else {
            return ProcessStatus::Error;
        };

        // Transport
        let steady_time = match block.timeline {
            Some(timeline) => {
                self.transport = TransportSnapshot::from_host(timeline);
                timeline.project_time_samples
            }
            None => STEADY_TIME_UNKNOWN,
        };

        // Buffer wiring
        let output_count = match block.output {
            Some(bus) => {
                self.outputs[0] = AudioBuffer::from_channels(bus.channel_buffers, bus.channel_count);
                1
            }
            None => 0,
        };

        // Event drain
        let mut scope = BlockScope::new(&mut self.queue);
        self.sink.reset();
        if let Some(events) = block.events {
            drain_events(&mut scope, events, block.frames);
        }
        if let Some(changes) = block.parameter_changes {
            drain_automation(&mut scope, changes, registry, block.frames);
        }

        // Ordering
        scope.sort();

        // Invoke
        let mut process_block = ProcessBlock {
            frames_count: block.frames,
            steady_time,
            transport: block.timeline.map(|_| &self.transport),
            audio_inputs: &[],
            audio_outputs: &mut self.outputs[..output_count],
            in_events: scope.queue(),
            out_events: &self.sink,
        };
        let status = target.process(&mut process_block);

        // Teardown: dropping the scope clears the queue
        self.overflowed = scope.queue().has_overflowed();
        drop(scope);

        status
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Number of input events currently queued.
    ///
    /// The queue only holds events while the target runs, so outside a
    /// processing call this is always 0.
    #[inline]
    pub fn input_event_count(&self) -> u32 {
        self.queue.len() as u32
    }

    /// Returns true if the last block produced more events than the
    /// configured input capacity. The excess was dropped.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Number of events the target emitted during the last block.
    #[inline]
    pub fn accepted_output_events(&self) -> u32 {
        self.sink.accepted()
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Map a host sample offset into `[0, frames)`.
///
/// Negative offsets are malformed and dropped; offsets past the block end are
/// pinned to the last frame.
#[inline]
fn block_offset(offset: i32, frames: u32) -> Option<u32> {
    let offset = u32::try_from(offset).ok()?;
    Some(offset.min(frames.saturating_sub(1)))
}

fn drain_events<'a, E>(scope: &mut BlockScope<'_, 'a>, events: &'a E, frames: u32)
where
    E: HostEventList + ?Sized,
{
    for index in 0..events.event_count() {
        let Some(event) = events.event(index) else {
            continue;
        };
        if let Some(converted) = convert_event(&event, frames) {
            scope.push(converted);
        }
    }
}

fn drain_automation<P, R>(scope: &mut BlockScope<'_, '_>, changes: &P, registry: &R, frames: u32)
where
    P: HostParameterChanges + ?Sized,
    R: ParameterRegistry + ?Sized,
{
    for index in 0..changes.parameter_count() {
        let Some(param_queue) = changes.queue(index) else {
            continue;
        };
        if let Some(converted) = convert_automation(&param_queue, registry, frames) {
            scope.push(converted);
        }
    }
}

/// Convert one host event. Returns `None` for kinds the target has no use
/// for and for malformed offsets.
///
/// A converted sysex event borrows the host's bytes and cannot outlive them:
///
/// ```compile_fail
/// use wrapclap_core::{convert_event, HostEvent, HostEventData, DATA_TYPE_MIDI_SYSEX};
///
/// let converted = {
///     let bytes = vec![0xF0, 0x01, 0xF7];
///     let event = HostEvent {
///         bus_index: 0,
///         sample_offset: 0,
///         is_live: false,
///         data: HostEventData::Data {
///             data_type: DATA_TYPE_MIDI_SYSEX,
///             bytes: &bytes,
///         },
///     };
///     convert_event(&event, 64)
/// };
/// assert!(converted.is_some());
/// ```
pub fn convert_event<'a>(event: &HostEvent<'a>, frames: u32) -> Option<ConvertedEvent<'a>> {
    let time = block_offset(event.sample_offset, frames)?;
    let flags = if event.is_live {
        EventFlags::IS_LIVE
    } else {
        EventFlags::empty()
    };

    let (kind, note) = match event.data {
        HostEventData::NoteOn(note) => (EventKind::NoteOn, note),
        HostEventData::NoteOff(note) => (EventKind::NoteOff, note),
        HostEventData::Data { data_type, bytes } if data_type == DATA_TYPE_MIDI_SYSEX => {
            let header = EventHeader {
                time,
                kind: EventKind::SysEx,
                flags,
            };
            let port_index = u16::try_from(event.bus_index).unwrap_or(0);
            return Some(ConvertedEvent::SysEx(SysExEvent::new(
                header, port_index, bytes,
            )));
        }
        HostEventData::Data { .. } | HostEventData::Other(_) => return None,
    };

    Some(ConvertedEvent::Note(NoteEvent {
        header: EventHeader { time, kind, flags },
        note_id: note.note_id,
        port_index: i16::try_from(event.bus_index).unwrap_or(NOT_APPLICABLE),
        channel: note.channel,
        key: note.pitch,
        velocity: f64::from(note.velocity),
    }))
}

/// Collapse one parameter's automation to its last point.
///
/// Returns `None` if the queue is empty, the point cannot be fetched, the
/// value is not a number, or the parameter is unknown to `registry`.
pub fn convert_automation<Q, R>(
    queue: &Q,
    registry: &R,
    frames: u32,
) -> Option<ConvertedEvent<'static>>
where
    Q: HostParameterQueue + ?Sized,
    R: ParameterRegistry + ?Sized,
{
    let last = queue.point_count().checked_sub(1)?;
    let point = queue.point(last)?;
    if point.value.is_nan() {
        return None;
    }
    let descriptor = registry.descriptor(queue.parameter_id())?;
    let time = block_offset(point.sample_offset, frames)?;

    let value = descriptor.to_plain(point.value.clamp(0.0, 1.0));
    Some(ConvertedEvent::ParamValue(ParamValueEvent::global(
        time,
        descriptor.id(),
        descriptor.cookie(),
        value,
    )))
}
