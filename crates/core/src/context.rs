use std::error::Error as StdError;

use thiserror::Error;

use crate::{Component, ComponentId, EventId, Probe, StateEvent, TimeEvent};

/// Errors a [`Context`] reports back to the calling component.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot schedule an event at {time} before the current time {now}")]
    RetroactiveEvent { time: f64, now: f64 },

    #[error("unknown component {0}")]
    UnknownComponent(ComponentId),

    #[error("component {0} is busy handling a callback")]
    ComponentBusy(ComponentId),

    #[error("the simulation is not running")]
    NotRunning,

    #[error("request rejected by the simulation")]
    Rejected(#[source] Box<dyn StdError + Send + Sync>),
}

impl ScheduleError {
    /// Wraps an arbitrary error as a rejection.
    pub fn rejected<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Rejected(Box::new(err))
    }
}

/// The handle a component receives during its callbacks.
///
/// Through the context a component can read the clock and other components'
/// outputs, schedule or cancel events, add or remove components, request the
/// run to stop, and emit log messages.
pub trait Context: Probe {
    /// Returns the current simulation time.
    fn now(&self) -> f64;

    fn start_time(&self) -> f64;

    fn stop_time(&self) -> f64;

    /// Returns the id of the component receiving the callback.
    fn me(&self) -> ComponentId;

    /// Adds a time event to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::RetroactiveEvent`] if the run is live and the
    /// event time lies before the current time, or
    /// [`ScheduleError::NotRunning`] if the run is shutting down.
    fn schedule(&mut self, event: TimeEvent) -> Result<EventId, ScheduleError>;

    /// Adds a state event to the pending list.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NotRunning`] if the run is shutting down.
    fn watch(&mut self, event: StateEvent) -> Result<EventId, ScheduleError>;

    /// Removes a pending time or state event.
    ///
    /// Returns false if no pending event has that id.
    fn unschedule(&mut self, id: EventId) -> bool;

    /// Registers a new component with the simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the component fails to start or cannot join the
    /// integrator.
    fn add_component(&mut self, component: Box<dyn Component>) -> Result<ComponentId, ScheduleError>;

    /// Removes a component and purges its pending events.
    ///
    /// Removing the calling component is allowed; it is dropped once its
    /// callback returns.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnknownComponent`] if no such component exists.
    fn remove_component(&mut self, id: ComponentId) -> Result<(), ScheduleError>;

    /// Asks the simulation to stop at the next loop boundary.
    fn request_stop(&mut self);

    /// Emits a log message to the simulation's observers.
    fn log(&mut self, message: &str);
}
