//! Host-side collaborator interfaces.
//!
//! The adapter reads one processing call's worth of host data through these
//! traits and plain structs. Protocol bindings (see `wrapclap-vst3`) implement
//! them over the host's native objects; tests implement them over vectors.
//!
//! Every accessor may fail per item (`None`); the adapter treats a failed
//! fetch as "event omitted this block".

use std::ptr;

use crate::types::ParameterId;

// =============================================================================
// Timeline
// =============================================================================

/// Host transport state bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostTransportState(u32);

impl HostTransportState {
    pub const PLAYING: Self = Self(1 << 1);
    pub const CYCLE_ACTIVE: Self = Self(1 << 2);
    pub const RECORDING: Self = Self(1 << 3);
    pub const SYSTEM_TIME_VALID: Self = Self(1 << 8);
    pub const PROJECT_TIME_MUSIC_VALID: Self = Self(1 << 9);
    pub const TEMPO_VALID: Self = Self(1 << 10);
    pub const BAR_POSITION_VALID: Self = Self(1 << 11);
    pub const CYCLE_VALID: Self = Self(1 << 12);
    pub const TIME_SIG_VALID: Self = Self(1 << 13);
    pub const SMPTE_VALID: Self = Self(1 << 14);
    pub const CLOCK_VALID: Self = Self(1 << 15);
    pub const CONT_TIME_VALID: Self = Self(1 << 17);
    pub const CHORD_VALID: Self = Self(1 << 18);

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// The subset of the host's timeline the adapter translates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostTimeline {
    pub state: HostTransportState,
    /// Project position in samples. Becomes the target's steady time.
    pub project_time_samples: i64,
    /// Project position in quarter notes.
    pub project_time_music: f64,
    /// Start of the current bar in quarter notes.
    pub bar_position_music: f64,
    pub cycle_start_music: f64,
    pub cycle_end_music: f64,
    pub tempo: f64,
    pub time_sig_numerator: i32,
    pub time_sig_denominator: i32,
}

// =============================================================================
// Events
// =============================================================================

/// Data event sub-kind for MIDI system-exclusive messages.
pub const DATA_TYPE_MIDI_SYSEX: u32 = 0;

/// Note payload of a host note-on/off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostNote {
    pub channel: i16,
    pub pitch: i16,
    pub velocity: f32,
    pub note_id: i32,
}

/// Host event payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEventData<'a> {
    NoteOn(HostNote),
    NoteOff(HostNote),
    /// Opaque data block; `data_type` selects the sub-kind.
    Data { data_type: u32, bytes: &'a [u8] },
    /// Any other kind, identified by the host's raw type tag.
    Other(u16),
}

/// One entry of the host's input event list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEvent<'a> {
    pub bus_index: i32,
    /// Sample offset within the block.
    pub sample_offset: i32,
    /// The event comes from live performance input.
    pub is_live: bool,
    pub data: HostEventData<'a>,
}

/// The host's input event list.
pub trait HostEventList {
    fn event_count(&self) -> usize;

    /// Fetch the event at `index`, or `None` if the host reports a failure.
    fn event(&self, index: usize) -> Option<HostEvent<'_>>;
}

// =============================================================================
// Parameter changes
// =============================================================================

/// One automation point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostPoint {
    pub sample_offset: i32,
    /// Normalized value.
    pub value: f64,
}

/// Automation points for a single parameter within one block.
pub trait HostParameterQueue {
    fn parameter_id(&self) -> ParameterId;

    fn point_count(&self) -> usize;

    /// Fetch the point at `index`, or `None` if the host reports a failure.
    fn point(&self, index: usize) -> Option<HostPoint>;
}

/// The host's per-block automation, one queue per changed parameter.
pub trait HostParameterChanges {
    type Queue<'q>: HostParameterQueue
    where
        Self: 'q;

    fn parameter_count(&self) -> usize;

    fn queue(&self, index: usize) -> Option<Self::Queue<'_>>;
}

// =============================================================================
// Empty collaborators
// =============================================================================

/// Event list for hosts that deliver no events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl HostEventList for NoEvents {
    fn event_count(&self) -> usize {
        0
    }

    fn event(&self, _index: usize) -> Option<HostEvent<'_>> {
        None
    }
}

/// Parameter changes for hosts that deliver no automation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameterChanges;

/// Queue type of [`NoParameterChanges`]; never produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyQueue;

impl HostParameterQueue for EmptyQueue {
    fn parameter_id(&self) -> ParameterId {
        0
    }

    fn point_count(&self) -> usize {
        0
    }

    fn point(&self, _index: usize) -> Option<HostPoint> {
        None
    }
}

impl HostParameterChanges for NoParameterChanges {
    type Queue<'q> = EmptyQueue;

    fn parameter_count(&self) -> usize {
        0
    }

    fn queue(&self, _index: usize) -> Option<EmptyQueue> {
        None
    }
}

// =============================================================================
// Audio and the processing call
// =============================================================================

/// Raw view of one host audio bus.
///
/// The adapter never dereferences these pointers; it forwards them to the
/// target unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostAudioBus {
    pub channel_buffers: *mut *mut f32,
    pub channel_count: u32,
}

impl HostAudioBus {
    pub const fn empty() -> Self {
        Self {
            channel_buffers: ptr::null_mut(),
            channel_count: 0,
        }
    }
}

impl Default for HostAudioBus {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything the host supplies for one processing call.
///
/// # Example
///
/// ```
/// use wrapclap_core::{HostBlock, HostTimeline};
///
/// let timeline = HostTimeline::default();
/// let block = HostBlock::new(64).with_timeline(&timeline);
/// assert_eq!(block.frames, 64);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HostBlock<'a, E = NoEvents, P = NoParameterChanges> {
    pub frames: u32,
    pub timeline: Option<&'a HostTimeline>,
    /// Main output bus, if the host supplied one.
    pub output: Option<HostAudioBus>,
    pub events: Option<&'a E>,
    pub parameter_changes: Option<&'a P>,
}

impl<'a> HostBlock<'a> {
    /// A block of `frames` samples with no timeline, audio, events or automation.
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            timeline: None,
            output: None,
            events: None,
            parameter_changes: None,
        }
    }
}

impl<'a, E, P> HostBlock<'a, E, P> {
    pub fn with_timeline(mut self, timeline: &'a HostTimeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn with_output(mut self, output: HostAudioBus) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_events<E2>(self, events: &'a E2) -> HostBlock<'a, E2, P> {
        HostBlock {
            frames: self.frames,
            timeline: self.timeline,
            output: self.output,
            events: Some(events),
            parameter_changes: self.parameter_changes,
        }
    }

    pub fn with_parameter_changes<P2>(self, changes: &'a P2) -> HostBlock<'a, E, P2> {
        HostBlock {
            frames: self.frames,
            timeline: self.timeline,
            output: self.output,
            events: self.events,
            parameter_changes: Some(changes),
        }
    }
}
