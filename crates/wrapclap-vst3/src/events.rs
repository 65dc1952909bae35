//! Host event list over `IEventList`.

use std::slice;

use vst3::ComRef;
use vst3::Steinberg::kResultOk;
use vst3::Steinberg::Vst::{Event, IEventList, IEventListTrait};

use wrapclap_core::{HostEvent, HostEventData, HostEventList, HostNote};

// VST3 event type constants
const K_NOTE_ON_EVENT: u16 = 0;
const K_NOTE_OFF_EVENT: u16 = 1;
const K_DATA_EVENT: u16 = 2;

// Event flags
const K_IS_LIVE: u16 = 1 << 0;

/// The host's input event list for one processing call.
pub struct Vst3EventList<'a> {
    list: ComRef<'a, IEventList>,
}

impl<'a> Vst3EventList<'a> {
    pub fn new(list: ComRef<'a, IEventList>) -> Self {
        Self { list }
    }

    /// Wrap a raw list pointer. Returns `None` for null.
    ///
    /// # Safety
    /// `list` must be null or point to a live `IEventList` for `'a`.
    pub unsafe fn from_raw(list: *mut IEventList) -> Option<Self> {
        ComRef::from_raw(list).map(Self::new)
    }
}

impl HostEventList for Vst3EventList<'_> {
    fn event_count(&self) -> usize {
        // SAFETY: the list is live for the lifetime of this wrapper.
        let count = unsafe { self.list.getEventCount() };
        count.max(0) as usize
    }

    fn event(&self, index: usize) -> Option<HostEvent<'_>> {
        let index = i32::try_from(index).ok()?;
        // SAFETY: `Event` is a plain C struct, all-zero is a valid value. The
        // data pointer inside it refers to host memory that outlives `self`.
        unsafe {
            let mut event: Event = std::mem::zeroed();
            if self.list.getEvent(index, &mut event) != kResultOk {
                return None;
            }
            Some(host_event(&event))
        }
    }
}

/// Decode a VST3 event into its protocol-neutral form.
///
/// # Safety
/// The union member matching `event.r#type` must be initialized, and for data
/// events `bytes` must be null or valid for `size` bytes for `'a`.
pub unsafe fn host_event<'a>(event: &Event) -> HostEvent<'a> {
    let data = match event.r#type {
        K_NOTE_ON_EVENT => {
            let note_on = &event.__field0.noteOn;
            HostEventData::NoteOn(HostNote {
                channel: note_on.channel,
                pitch: note_on.pitch,
                velocity: note_on.velocity,
                note_id: note_on.noteId,
            })
        }
        K_NOTE_OFF_EVENT => {
            let note_off = &event.__field0.noteOff;
            HostEventData::NoteOff(HostNote {
                channel: note_off.channel,
                pitch: note_off.pitch,
                velocity: note_off.velocity,
                note_id: note_off.noteId,
            })
        }
        K_DATA_EVENT => {
            let data_event = &event.__field0.data;
            let bytes: &'a [u8] = if data_event.bytes.is_null() || data_event.size == 0 {
                &[]
            } else {
                slice::from_raw_parts(data_event.bytes, data_event.size as usize)
            };
            HostEventData::Data {
                data_type: data_event.r#type,
                bytes,
            }
        }
        other => HostEventData::Other(other),
    };

    HostEvent {
        bus_index: event.busIndex,
        sample_offset: event.sampleOffset,
        is_live: event.flags & K_IS_LIVE != 0,
        data,
    }
}
