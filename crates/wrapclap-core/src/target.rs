//! Target-side interfaces.
//!
//! The adapter drives the target plugin through [`TargetPlugin::process`],
//! handing it a [`ProcessBlock`]. During that call the target pulls the
//! block's events through [`EventSource`] and may emit events into an
//! [`EventSink`].

use std::cell::Cell;
use std::ptr;

use crate::event::ConvertedEvent;
use crate::transport::TransportSnapshot;

// =============================================================================
// ProcessStatus
// =============================================================================

/// Result of one target processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessStatus {
    /// Processing failed; the output should be treated as silence.
    Error,
    #[default]
    Continue,
    /// Keep processing only while the input is not silent.
    ContinueIfNotQuiet,
    /// The target is rendering a tail after its input went quiet.
    Tail,
    /// The target needs no processing until new events arrive.
    Sleep,
}

impl ProcessStatus {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

// =============================================================================
// Audio
// =============================================================================

/// Audio buffer descriptor passed to the target.
///
/// Channel pointers belong to the host and are forwarded without copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioBuffer {
    pub data32: *mut *mut f32,
    pub channel_count: u32,
    pub latency: u32,
    /// Bit `n` set means channel `n` holds a constant value.
    pub constant_mask: u64,
}

impl AudioBuffer {
    pub const fn empty() -> Self {
        Self {
            data32: ptr::null_mut(),
            channel_count: 0,
            latency: 0,
            constant_mask: 0,
        }
    }

    /// Point at `channel_count` host channel buffers.
    pub const fn from_channels(data32: *mut *mut f32, channel_count: u32) -> Self {
        Self {
            data32,
            channel_count,
            latency: 0,
            constant_mask: 0,
        }
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Events
// =============================================================================

/// Read-only view of the block's ordered input events.
pub trait EventSource {
    /// Number of events in delivery order.
    fn size(&self) -> u32;

    /// The event at delivery position `index`, or `None` if out of range.
    ///
    /// The returned event may borrow host data, so it is only valid while
    /// the source is borrowed.
    fn get(&self, index: u32) -> Option<&ConvertedEvent<'_>>;
}

/// Header of an event the target emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmittedEvent {
    pub time: u32,
    pub space_id: u16,
    pub type_id: u16,
    pub flags: u32,
}

/// Destination for events the target emits during processing.
pub trait EventSink {
    /// Offer one event. Returns `true` if it was accepted.
    fn try_push(&self, event: &EmittedEvent) -> bool;
}

/// Sink that accepts and discards every event.
///
/// The host side has no path for plugin-emitted events, so they are
/// acknowledged and dropped. The number accepted is kept for diagnostics.
#[derive(Debug, Default)]
pub struct DiscardingSink {
    accepted: Cell<u32>,
}

impl DiscardingSink {
    pub const fn new() -> Self {
        Self {
            accepted: Cell::new(0),
        }
    }

    /// Events accepted since the last [`reset`](Self::reset).
    #[inline]
    pub fn accepted(&self) -> u32 {
        self.accepted.get()
    }

    #[inline]
    pub fn reset(&self) {
        self.accepted.set(0);
    }
}

impl EventSink for DiscardingSink {
    #[inline]
    fn try_push(&self, _event: &EmittedEvent) -> bool {
        self.accepted.set(self.accepted.get().saturating_add(1));
        true
    }
}

// =============================================================================
// ProcessBlock / TargetPlugin
// =============================================================================

/// Everything the target sees for one block.
pub struct ProcessBlock<'a> {
    pub frames_count: u32,
    /// Host project position in samples, or -1 when unknown.
    pub steady_time: i64,
    pub transport: Option<&'a TransportSnapshot>,
    pub audio_inputs: &'a [AudioBuffer],
    pub audio_outputs: &'a mut [AudioBuffer],
    pub in_events: &'a dyn EventSource,
    pub out_events: &'a dyn EventSink,
}

/// A plugin the adapter can drive.
///
/// Called on the audio thread: implementations must not allocate or block.
pub trait TargetPlugin {
    fn process(&mut self, block: &mut ProcessBlock<'_>) -> ProcessStatus;
}

impl<T: TargetPlugin + ?Sized> TargetPlugin for Box<T> {
    fn process(&mut self, block: &mut ProcessBlock<'_>) -> ProcessStatus {
        (**self).process(block)
    }
}
