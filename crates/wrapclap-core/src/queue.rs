//! Per-block event buffer and delivery order.
//!
//! [`EventQueue`] holds the converted events of one block in arrival order
//! plus an index defining the order they are delivered in. Capacity is fixed
//! when the adapter is configured; pushing past it drops the event and sets
//! an overflow flag instead of reallocating on the audio thread.
//!
//! Events that borrow host data only enter the queue through a
//! [`BlockScope`], which empties the queue again when it is dropped.

use std::marker::PhantomData;
use std::mem;

use crate::event::ConvertedEvent;
use crate::target::EventSource;

/// Fixed-capacity event buffer with a time-ordered index.
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Stored as `'static`; events pushed by a [`BlockScope`] actually
    /// borrow data that lives at least as long as that scope.
    events: Vec<ConvertedEvent<'static>>,
    /// Positions into `events`, in delivery order once sorted.
    order: Vec<u32>,
    capacity: usize,
    /// Set to true when a push fails due to buffer exhaustion
    overflowed: bool,
}

impl EventQueue {
    /// Create a queue that holds up to `capacity` events per block.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut queue = Self::default();
        queue.reserve(capacity);
        queue
    }

    /// Empty the queue and size it for `capacity` events.
    ///
    /// Allocates; call only from the setup phase.
    pub fn reserve(&mut self, capacity: usize) {
        self.clear();
        self.events.reserve_exact(capacity);
        self.order.reserve_exact(capacity);
        self.capacity = capacity;
    }

    /// Remove all events, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.order.clear();
        self.overflowed = false;
    }

    /// Append an event in arrival order.
    ///
    /// Returns `false` and sets the overflow flag if the queue is full.
    #[inline]
    pub fn push(&mut self, event: ConvertedEvent<'static>) -> bool {
        if self.events.len() >= self.capacity {
            self.overflowed = true;
            return false;
        }
        self.order.push(self.events.len() as u32);
        self.events.push(event);
        true
    }

    /// Order the index by timestamp, ties keeping arrival order.
    ///
    /// The arrival position is part of the sort key, so the result matches a
    /// stable sort without the scratch allocation a stable sort may need.
    pub fn sort(&mut self) {
        let events = &self.events;
        self.order
            .sort_unstable_by_key(|&position| (events[position as usize].time(), position));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if any push failed since the last clear.
    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Returns the event delivered at position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ConvertedEvent<'_>> {
        let position = *self.order.get(index)?;
        self.events.get(position as usize)
    }

    /// Iterate over events in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &ConvertedEvent<'_>> {
        self.order
            .iter()
            .map(move |&position| &self.events[position as usize])
    }
}

impl EventSource for EventQueue {
    #[inline]
    fn size(&self) -> u32 {
        self.len() as u32
    }

    #[inline]
    fn get(&self, index: u32) -> Option<&ConvertedEvent<'_>> {
        EventQueue::get(self, index as usize)
    }
}

// =============================================================================
// BlockScope
// =============================================================================

/// Exclusive use of an [`EventQueue`] for one processing call.
///
/// Accepts events borrowing host data for `'a` and clears the queue on drop,
/// including during unwinding, so no borrowed event is left behind once `'a`
/// may have ended. Reads go through [`queue`](Self::queue), whose borrow is
/// bounded by the scope.
pub(crate) struct BlockScope<'q, 'a> {
    queue: &'q mut EventQueue,
    _host: PhantomData<&'a [u8]>,
}

impl<'q, 'a> BlockScope<'q, 'a> {
    pub(crate) fn new(queue: &'q mut EventQueue) -> Self {
        queue.clear();
        Self {
            queue,
            _host: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, event: ConvertedEvent<'a>) -> bool {
        // SAFETY: only the lifetime changes. The event stays in the queue no
        // longer than this scope, and the scope cannot outlive `'a`.
        let event = unsafe { mem::transmute::<ConvertedEvent<'a>, ConvertedEvent<'static>>(event) };
        self.queue.push(event)
    }

    #[inline]
    pub(crate) fn sort(&mut self) {
        self.queue.sort();
    }

    #[inline]
    pub(crate) fn queue(&self) -> &EventQueue {
        self.queue
    }
}

impl Drop for BlockScope<'_, '_> {
    fn drop(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{
        EventFlags, EventHeader, EventKind, NoteEvent, ParamValueEvent, SysExEvent,
    };
    use crate::types::Cookie;

    fn note(time: u32, key: i16) -> ConvertedEvent<'static> {
        ConvertedEvent::Note(NoteEvent {
            header: EventHeader {
                time,
                kind: EventKind::NoteOn,
                flags: EventFlags::empty(),
            },
            note_id: -1,
            port_index: 0,
            channel: 0,
            key,
            velocity: 1.0,
        })
    }

    fn param(time: u32, id: u32) -> ConvertedEvent<'static> {
        ConvertedEvent::ParamValue(ParamValueEvent::global(time, id, Cookie::null(), 0.0))
    }

    fn keys(queue: &EventQueue) -> Vec<(u32, EventKind)> {
        queue.iter().map(|e| (e.time(), e.kind())).collect()
    }

    #[test]
    fn test_sort_by_time() {
        let mut queue = EventQueue::with_capacity(8);
        queue.push(note(30, 60));
        queue.push(note(10, 62));
        queue.push(note(20, 64));
        queue.sort();
        let times: Vec<u32> = queue.iter().map(|e| e.time()).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut queue = EventQueue::with_capacity(8);
        queue.push(param(5, 1));
        queue.push(note(5, 60));
        queue.push(param(0, 2));
        queue.push(note(5, 61));
        queue.sort();
        assert_eq!(
            keys(&queue),
            vec![
                (0, EventKind::ParamValue),
                (5, EventKind::ParamValue),
                (5, EventKind::NoteOn),
                (5, EventKind::NoteOn),
            ]
        );
        // Same-time notes stay in arrival order too
        match (queue.get(2), queue.get(3)) {
            (Some(ConvertedEvent::Note(a)), Some(ConvertedEvent::Note(b))) => {
                assert_eq!((a.key, b.key), (60, 61));
            }
            _ => panic!("expected two notes"),
        }
    }

    #[test]
    fn test_many_ties_stay_ordered() {
        let mut queue = EventQueue::with_capacity(200);
        for i in 0..200 {
            queue.push(note(7, i as i16));
        }
        queue.sort();
        for (i, event) in queue.iter().enumerate() {
            match event {
                ConvertedEvent::Note(n) => assert_eq!(n.key, i as i16),
                _ => panic!("expected note"),
            }
        }
    }

    #[test]
    fn test_out_of_range_get() {
        let mut queue = EventQueue::with_capacity(4);
        queue.push(note(0, 60));
        assert!(queue.get(0).is_some());
        assert!(queue.get(1).is_none());
        assert!(EventSource::get(&queue, 100).is_none());
        assert_eq!(queue.size(), 1);
    }

    #[test]
    fn test_overflow_drops_and_flags() {
        let mut queue = EventQueue::with_capacity(2);
        assert!(queue.push(note(0, 60)));
        assert!(queue.push(note(1, 61)));
        assert!(!queue.push(note(2, 62)));
        assert_eq!(queue.len(), 2);
        assert!(queue.has_overflowed());

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.has_overflowed());
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn test_push_does_not_reallocate() {
        let mut queue = EventQueue::with_capacity(16);
        let before = queue.events.capacity();
        for i in 0..32 {
            queue.push(note(i, 60));
        }
        assert_eq!(queue.events.capacity(), before);
        assert_eq!(queue.len(), 16);
    }

    #[test]
    fn test_scope_holds_borrowed_sysex() {
        let mut queue = EventQueue::with_capacity(4);
        let bytes = vec![0xF0, 0x42, 0xF7];
        {
            let mut scope = BlockScope::new(&mut queue);
            let header = EventHeader {
                time: 2,
                kind: EventKind::SysEx,
                flags: EventFlags::empty(),
            };
            assert!(scope.push(ConvertedEvent::SysEx(SysExEvent::new(header, 0, &bytes))));
            scope.push(note(1, 60));
            scope.sort();

            let kinds: Vec<EventKind> = scope.queue().iter().map(|e| e.kind()).collect();
            assert_eq!(kinds, vec![EventKind::NoteOn, EventKind::SysEx]);
            match scope.queue().get(1) {
                Some(ConvertedEvent::SysEx(sysex)) => {
                    assert_eq!(sysex.bytes(), &bytes[..]);
                    assert_eq!(sysex.as_ptr(), bytes.as_ptr());
                }
                other => panic!("expected sysex, got {:?}", other),
            }
        }
        assert!(queue.is_empty());
        drop(bytes);
        assert!(queue.get(0).is_none());
    }

    #[test]
    fn test_scope_clears_on_unwind() {
        let mut queue = EventQueue::with_capacity(4);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = BlockScope::new(&mut queue);
            scope.push(note(0, 60));
            panic!("target failed");
        }));
        assert!(result.is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_scope_starts_empty() {
        let mut queue = EventQueue::with_capacity(4);
        queue.push(note(0, 60));
        let scope = BlockScope::new(&mut queue);
        assert!(scope.queue().is_empty());
    }
}
