use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{ComponentId, EventId, TimeEvent};

/// A priority queue of time events.
///
/// The head is the event with the smallest time; ties go to the higher
/// priority and then to the event enqueued first.
#[derive(Debug, Default)]
pub struct TimeEventQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    event: TimeEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // `BinaryHeap` is a max-heap, so "greater" means "fires first".
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then_with(|| self.event.info().priority().cmp(&other.event.info().priority()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl TimeEventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event, keeping the queue ordered.
    pub fn add(&mut self, event: TimeEvent) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Entry { seq, event });
    }

    /// Returns the head event without removing it.
    #[must_use]
    pub fn peek_first(&self) -> Option<&TimeEvent> {
        self.heap.peek().map(|entry| &entry.event)
    }

    /// Removes and returns the head event.
    pub fn remove_first(&mut self) -> Option<TimeEvent> {
        self.heap.pop().map(|entry| entry.event)
    }

    /// Removes the event with the given id, if it is queued.
    pub fn remove_by_identity(&mut self, id: EventId) -> Option<TimeEvent> {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let removed = entries
            .iter()
            .position(|entry| entry.event.id() == id)
            .map(|index| entries.swap_remove(index).event);
        self.heap = BinaryHeap::from(entries);
        removed
    }

    /// Removes every event whose source or target is `component`.
    ///
    /// Returns the number of events removed.
    pub fn remove_all_for(&mut self, component: ComponentId) -> usize {
        let before = self.heap.len();
        self.heap.retain(|entry| !entry.event.info().involves(component));
        before - self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterates the queued events in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeEvent> {
        self.heap.iter().map(|entry| &entry.event)
    }
}
