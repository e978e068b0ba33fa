use std::{cell::Cell, fmt};

use thiserror::Error;

use crate::{ComponentId, EventId, Probe};

/// Errors raised when constructing an event.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EventError {
    #[error("recurrence interval must be positive, got {0}")]
    NonPositiveInterval(f64),

    #[error("event time must be finite, got {0}")]
    NonFiniteTime(f64),
}

/// Fields shared by time events and state events.
///
/// The cancel flag is interior-mutable so a handler holding `&EventInfo` can
/// cancel the event it is handling. Canceling only suppresses recurrence; a
/// canceled event already in a queue is still dispatched.
#[derive(Debug, Clone)]
pub struct EventInfo {
    id: EventId,
    source: Option<ComponentId>,
    target: Option<ComponentId>,
    priority: i32,
    payload: i32,
    canceled: Cell<bool>,
}

impl EventInfo {
    fn new() -> Self {
        Self {
            id: EventId::next(),
            source: None,
            target: None,
            priority: 0,
            payload: 0,
            canceled: Cell::new(false),
        }
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[must_use]
    pub fn source(&self) -> Option<ComponentId> {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> Option<ComponentId> {
        self.target
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the payload tag, an arbitrary integer the target can switch on.
    #[must_use]
    pub fn payload(&self) -> i32 {
        self.payload
    }

    /// Prevents the event from recurring after the current dispatch.
    pub fn cancel(&self) {
        self.canceled.set(true);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled.get()
    }

    /// Returns true if the component is the event's source or target.
    #[must_use]
    pub fn involves(&self, component: ComponentId) -> bool {
        self.source == Some(component) || self.target == Some(component)
    }
}

/// How a time event behaves after it has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recurrence {
    /// Discarded after dispatch.
    Once,

    /// Re-enqueued at `time + interval` unless canceled.
    Every(f64),

    /// Re-enqueued at `time + step`, where `step` is the target's update time
    /// step read again after every dispatch.
    Scheduled,
}

/// An event scheduled for an absolute simulation time.
#[derive(Debug, Clone)]
pub struct TimeEvent {
    info: EventInfo,
    time: f64,
    recurrence: Recurrence,
}

impl TimeEvent {
    /// Creates a one-shot event at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NonFiniteTime`] if `time` is NaN or infinite.
    pub fn new(time: f64) -> Result<Self, EventError> {
        Self::with_recurrence(time, Recurrence::Once)
    }

    /// Creates an event at `time` that recurs every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is not finite or `interval` is not a
    /// positive finite number.
    pub fn recurring(time: f64, interval: f64) -> Result<Self, EventError> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(EventError::NonPositiveInterval(interval));
        }
        Self::with_recurrence(time, Recurrence::Every(interval))
    }

    /// Creates an event whose recurrence follows its target's update schedule.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NonFiniteTime`] if `time` is NaN or infinite.
    pub fn scheduled(time: f64) -> Result<Self, EventError> {
        Self::with_recurrence(time, Recurrence::Scheduled)
    }

    fn with_recurrence(time: f64, recurrence: Recurrence) -> Result<Self, EventError> {
        if !time.is_finite() {
            return Err(EventError::NonFiniteTime(time));
        }
        Ok(Self {
            info: EventInfo::new(),
            time,
            recurrence,
        })
    }

    #[must_use]
    pub fn with_source(mut self, source: ComponentId) -> Self {
        self.info.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: ComponentId) -> Self {
        self.info.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.info.priority = priority;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: i32) -> Self {
        self.info.payload = payload;
        self
    }

    #[must_use]
    pub fn info(&self) -> &EventInfo {
        &self.info
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.info.id
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Returns the event's next occurrence after it has been dispatched.
    ///
    /// `schedule_step` is the target's current update time step and is only
    /// consulted for [`Recurrence::Scheduled`]. Returns `None` when the event
    /// does not recur, was canceled, or the step is not positive. The next
    /// occurrence keeps the event's id.
    #[must_use]
    pub fn next_occurrence(mut self, schedule_step: Option<f64>) -> Option<Self> {
        if self.info.is_canceled() {
            return None;
        }
        let step = match self.recurrence {
            Recurrence::Once => return None,
            Recurrence::Every(interval) => interval,
            Recurrence::Scheduled => schedule_step.filter(|step| *step > 0.0)?,
        };
        self.time += step;
        Some(self)
    }
}

/// A condition over component outputs that triggers a state event.
///
/// Conditions are polled repeatedly, including at trial instants during
/// bisection, so they must not have side effects.
pub trait StateCondition {
    /// Returns true when the condition holds at `time`.
    fn check(&self, probe: &dyn Probe, time: f64) -> bool;
}

impl<F> StateCondition for F
where
    F: Fn(&dyn Probe, f64) -> bool,
{
    fn check(&self, probe: &dyn Probe, time: f64) -> bool {
        self(probe, time)
    }
}

/// An event that fires when its condition becomes true.
pub struct StateEvent {
    info: EventInfo,
    condition: Box<dyn StateCondition>,
}

impl StateEvent {
    /// Creates a state event from a closure over a probe and the current time.
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn(&dyn Probe, f64) -> bool + 'static,
    {
        Self::from_condition(condition)
    }

    /// Creates a state event from any [`StateCondition`].
    pub fn from_condition(condition: impl StateCondition + 'static) -> Self {
        Self {
            info: EventInfo::new(),
            condition: Box::new(condition),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: ComponentId) -> Self {
        self.info.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: ComponentId) -> Self {
        self.info.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.info.priority = priority;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: i32) -> Self {
        self.info.payload = payload;
        self
    }

    #[must_use]
    pub fn info(&self) -> &EventInfo {
        &self.info
    }

    #[must_use]
    pub fn id(&self) -> EventId {
        self.info.id
    }

    /// Evaluates the condition.
    #[must_use]
    pub fn is_triggered(&self, probe: &dyn Probe, time: f64) -> bool {
        self.condition.check(probe, time)
    }
}

impl fmt::Debug for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateEvent")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
