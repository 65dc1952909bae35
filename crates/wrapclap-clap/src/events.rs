//! CLAP event lists backed by the adapter's ordered queue.
//!
//! The target plugin reads input events through a `clap_input_events` whose
//! `ctx` points at a slice of [`ClapEvent`]s, and emits events through a
//! `clap_output_events` whose `ctx` points at an [`EventSink`]. Both lists
//! are built on the stack for a single `process` call and die with it.

use std::ffi::c_void;
use std::mem;
use std::ptr;

use clap_sys::events::{
    clap_event_header, clap_event_midi_sysex, clap_event_note, clap_event_param_value,
    clap_input_events, clap_output_events, CLAP_CORE_EVENT_SPACE_ID, CLAP_EVENT_DONT_RECORD,
    CLAP_EVENT_IS_LIVE, CLAP_EVENT_MIDI_SYSEX, CLAP_EVENT_NOTE_OFF, CLAP_EVENT_NOTE_ON,
    CLAP_EVENT_PARAM_VALUE,
};

use wrapclap_core::{ConvertedEvent, EmittedEvent, EventFlags, EventHeader, EventKind, EventSink};

// =============================================================================
// ClapEvent
// =============================================================================

/// A converted event in CLAP's wire layout.
///
/// Each variant starts with a `clap_event_header`, so a pointer to the header
/// is a valid pointer to the whole event for the plugin.
#[derive(Debug, Clone, Copy)]
pub enum ClapEvent {
    Note(clap_event_note),
    SysEx(clap_event_midi_sysex),
    ParamValue(clap_event_param_value),
}

// SAFETY: the raw pointers (sysex bytes, param cookies) are only read on the
// audio thread during the processing call that produced them.
unsafe impl Send for ClapEvent {}

impl ClapEvent {
    /// Convert an adapter event into CLAP layout. Sysex bytes stay borrowed.
    pub fn from_converted(event: &ConvertedEvent<'_>) -> Self {
        match event {
            ConvertedEvent::Note(note) => Self::Note(clap_event_note {
                header: header::<clap_event_note>(&note.header),
                note_id: note.note_id,
                port_index: note.port_index,
                channel: note.channel,
                key: note.key,
                velocity: note.velocity,
            }),
            ConvertedEvent::SysEx(sysex) => Self::SysEx(clap_event_midi_sysex {
                header: header::<clap_event_midi_sysex>(&sysex.header),
                port_index: sysex.port_index,
                buffer: sysex.as_ptr(),
                size: sysex.len(),
            }),
            ConvertedEvent::ParamValue(param) => Self::ParamValue(clap_event_param_value {
                header: header::<clap_event_param_value>(&param.header),
                param_id: param.param_id,
                cookie: param.cookie.as_ptr(),
                note_id: param.note_id,
                port_index: param.port_index,
                channel: param.channel,
                key: param.key,
                value: param.value,
            }),
        }
    }

    /// The shared CLAP header.
    #[inline]
    pub fn header(&self) -> &clap_event_header {
        match self {
            Self::Note(e) => &e.header,
            Self::SysEx(e) => &e.header,
            Self::ParamValue(e) => &e.header,
        }
    }
}

fn header<T>(header: &EventHeader) -> clap_event_header {
    let type_ = match header.kind {
        EventKind::NoteOn => CLAP_EVENT_NOTE_ON,
        EventKind::NoteOff => CLAP_EVENT_NOTE_OFF,
        EventKind::SysEx => CLAP_EVENT_MIDI_SYSEX,
        EventKind::ParamValue => CLAP_EVENT_PARAM_VALUE,
    };
    let mut flags = 0;
    if header.flags.contains(EventFlags::IS_LIVE) {
        flags |= CLAP_EVENT_IS_LIVE;
    }
    if header.flags.contains(EventFlags::DONT_RECORD) {
        flags |= CLAP_EVENT_DONT_RECORD;
    }
    clap_event_header {
        size: mem::size_of::<T>() as u32,
        time: header.time,
        space_id: CLAP_CORE_EVENT_SPACE_ID,
        type_,
        flags,
    }
}

// =============================================================================
// Input events
// =============================================================================

/// Build an input list over `events`.
///
/// `ctx` points at the slice reference itself, so `events` must stay in
/// place for as long as the returned list is used.
pub fn input_events(events: &&[ClapEvent]) -> clap_input_events {
    clap_input_events {
        ctx: events as *const &[ClapEvent] as *mut c_void,
        size: Some(input_events_size),
        get: Some(input_events_get),
    }
}

unsafe fn input_slice<'a>(list: *const clap_input_events) -> Option<&'a [ClapEvent]> {
    if list.is_null() || (*list).ctx.is_null() {
        return None;
    }
    Some(*((*list).ctx as *const &[ClapEvent]))
}

unsafe extern "C" fn input_events_size(list: *const clap_input_events) -> u32 {
    input_slice(list).map_or(0, |events| events.len() as u32)
}

unsafe extern "C" fn input_events_get(
    list: *const clap_input_events,
    index: u32,
) -> *const clap_event_header {
    match input_slice(list).and_then(|events| events.get(index as usize)) {
        Some(event) => event.header() as *const clap_event_header,
        None => ptr::null(),
    }
}

// =============================================================================
// Output events
// =============================================================================

/// Build an output list that forwards every pushed event to `sink`.
///
/// `sink` must stay in place for as long as the returned list is used.
pub fn output_events(sink: &&dyn EventSink) -> clap_output_events {
    clap_output_events {
        ctx: sink as *const &dyn EventSink as *mut c_void,
        try_push: Some(output_events_try_push),
    }
}

unsafe extern "C" fn output_events_try_push(
    list: *const clap_output_events,
    event: *const clap_event_header,
) -> bool {
    if list.is_null() || event.is_null() || (*list).ctx.is_null() {
        return false;
    }
    let sink = *((*list).ctx as *const &dyn EventSink);
    let header = &*event;
    sink.try_push(&EmittedEvent {
        time: header.time,
        space_id: header.space_id,
        type_id: header.type_,
        flags: header.flags,
    })
}
