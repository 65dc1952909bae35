//! Converted events handed to the target plugin.
//!
//! Every event is a [`ConvertedEvent`]: a tagged variant whose payloads all
//! embed the same [`EventHeader`], so the target can branch on
//! [`EventHeader::kind`] before looking at the payload.

use crate::types::{Cookie, ParameterId, ParameterValue, NOTE_ID_ANY, NOT_APPLICABLE};

// =============================================================================
// Header
// =============================================================================

/// Event kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    SysEx,
    ParamValue,
}

/// Event flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventFlags(u32);

impl EventFlags {
    /// The event comes from live input rather than sequenced playback.
    pub const IS_LIVE: Self = Self(1 << 0);
    /// The target should not record this event.
    pub const DONT_RECORD: Self = Self(1 << 1);

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
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

/// Fields shared by every event variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventHeader {
    /// Sample offset within the block.
    pub time: u32,
    pub kind: EventKind,
    pub flags: EventFlags,
}

// =============================================================================
// Payloads
// =============================================================================

/// Note on/off payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub header: EventHeader,
    pub note_id: i32,
    pub port_index: i16,
    pub channel: i16,
    pub key: i16,
    /// Velocity in `[0, 1]`.
    pub velocity: f64,
}

/// System-exclusive payload.
///
/// The bytes are borrowed from the host's event list, so the event cannot
/// outlive the processing call that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SysExEvent<'a> {
    pub header: EventHeader,
    pub port_index: u16,
    bytes: &'a [u8],
}

impl<'a> SysExEvent<'a> {
    pub fn new(header: EventHeader, port_index: u16, bytes: &'a [u8]) -> Self {
        Self {
            header,
            port_index,
            bytes,
        }
    }

    /// The message bytes, including the framing `F0`/`F7` bytes if the host
    /// supplied them.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Raw pointer to the message, for handing to a foreign target.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.bytes.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Parameter automation payload. Always global: the note-scoped fields are
/// fixed to "not applicable".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamValueEvent {
    pub header: EventHeader,
    pub param_id: ParameterId,
    pub cookie: Cookie,
    pub note_id: i32,
    pub port_index: i16,
    pub channel: i16,
    pub key: i16,
    /// Value in plain units.
    pub value: ParameterValue,
}

impl ParamValueEvent {
    /// Create a global parameter-value event.
    pub fn global(time: u32, param_id: ParameterId, cookie: Cookie, value: ParameterValue) -> Self {
        Self {
            header: EventHeader {
                time,
                kind: EventKind::ParamValue,
                flags: EventFlags::empty(),
            },
            param_id,
            cookie,
            note_id: NOTE_ID_ANY,
            port_index: NOT_APPLICABLE,
            channel: NOT_APPLICABLE,
            key: NOT_APPLICABLE,
            value,
        }
    }
}

// =============================================================================
// ConvertedEvent
// =============================================================================

/// One event in the per-block queue.
///
/// `'a` is the lifetime of host data the event borrows. Only sysex events
/// borrow anything; notes and automation are `ConvertedEvent<'static>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvertedEvent<'a> {
    /// Note on or note off, distinguished by the header kind.
    Note(NoteEvent),
    SysEx(SysExEvent<'a>),
    ParamValue(ParamValueEvent),
}

impl ConvertedEvent<'_> {
    /// The shared header, regardless of variant.
    #[inline]
    pub fn header(&self) -> &EventHeader {
        match self {
            Self::Note(e) => &e.header,
            Self::SysEx(e) => &e.header,
            Self::ParamValue(e) => &e.header,
        }
    }

    #[inline]
    pub fn time(&self) -> u32 {
        self.header().time
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.header().kind
    }
}
