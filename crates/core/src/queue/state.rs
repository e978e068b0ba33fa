use crate::{ComponentId, EventId, Probe, StateEvent};

/// Pending state events, kept in priority order.
///
/// Higher priorities are checked first; events with equal priority are
/// checked in the order they were added.
#[derive(Debug, Default)]
pub struct StateEventList {
    events: Vec<StateEvent>,
}

impl StateEventList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: StateEvent) {
        let priority = event.info().priority();
        let index = self
            .events
            .partition_point(|e| e.info().priority() >= priority);
        self.events.insert(index, event);
    }

    /// Returns true if any pending condition holds at `time`.
    #[must_use]
    pub fn has_any(&self, probe: &dyn Probe, time: f64) -> bool {
        self.events.iter().any(|e| e.is_triggered(probe, time))
    }

    /// Removes and returns the highest-priority event whose condition holds.
    pub fn take_next(&mut self, probe: &dyn Probe, time: f64) -> Option<StateEvent> {
        let index = self
            .events
            .iter()
            .position(|e| e.is_triggered(probe, time))?;
        Some(self.events.remove(index))
    }

    pub fn remove_by_identity(&mut self, id: EventId) -> Option<StateEvent> {
        let index = self.events.iter().position(|e| e.id() == id)?;
        Some(self.events.remove(index))
    }

    /// Removes every event whose source or target is `component`.
    ///
    /// Returns the number of events removed.
    pub fn remove_all_for(&mut self, component: ComponentId) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !e.info().involves(component));
        before - self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates pending events in the order they are checked.
    pub fn iter(&self) -> impl Iterator<Item = &StateEvent> {
        self.events.iter()
    }
}
