use std::error::Error as StdError;

use crate::{Context, EventInfo, Ports};

/// Error type returned by component callbacks.
///
/// Components report failures as boxed errors so that every model can use
/// its own error type; the kernel wraps them with the component's identity
/// and the lifecycle phase in which they occurred.
pub type ComponentError = Box<dyn StdError + Send + Sync>;

/// Well-known event priorities.
///
/// Larger values fire first when events share the same time.
pub mod priority {
    /// Components that collect output after the model updates.
    pub const COLLECT_OUTPUT: i32 = 300;

    /// Default priority for update-scheduled components.
    pub const UPDATE: i32 = 400;

    /// Integration drivers.
    pub const INTEGRATION: i32 = 500;

    /// Kernel bookkeeping that must precede everything else.
    pub const SYSTEM: i32 = 10_000;
}

/// A participant in a simulation run.
///
/// Every method except [`name`](Component::name) has a default, so a minimal
/// component only names itself. Optional capabilities are exposed through
/// accessor methods returning `Option`:
///
/// - [`state_contributor`](Component::state_contributor) makes the component
///   part of the shared continuous state vector advanced by the integrator.
/// - [`update_schedule`](Component::update_schedule) asks the kernel to
///   schedule time events for the component at the start of every run.
///
/// Callbacks receive a [`Context`] through which they can read the clock,
/// schedule events, and add or remove components while the run is live.
pub trait Component {
    /// Returns the component's name.
    fn name(&self) -> &str;

    /// Returns the component's declared inputs, outputs, and state/rate pairs.
    fn ports(&self) -> &Ports {
        Ports::empty()
    }

    /// Returns the current value of a named output.
    ///
    /// Returns `None` if the component has no output with that name.
    fn output(&self, _name: &str) -> Option<f64> {
        None
    }

    /// Sets the value of a named input.
    ///
    /// The kernel only forwards names the component declares in
    /// [`ports`](Component::ports).
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be set. The default
    /// implementation rejects every input.
    fn set_input(&mut self, name: &str, _value: f64) -> Result<(), ComponentError> {
        Err(format!("input `{name}` is not settable").into())
    }

    /// Called when a run starts, or immediately when the component is
    /// registered with a running simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the component cannot start. The run is aborted.
    fn start_run(&mut self, _ctx: &mut dyn Context) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called when a run ends, or when the component is removed from a
    /// running simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the component fails to shut down. The remaining
    /// components are still notified.
    fn end_run(&mut self, _ctx: &mut dyn Context) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Handles an event targeting this component.
    ///
    /// # Errors
    ///
    /// Returns an error if handling fails. The current step is aborted.
    fn handle_event(
        &mut self,
        _event: &EventInfo,
        _ctx: &mut dyn Context,
    ) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Returns the state-contributor capability, if the component has one.
    fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
        None
    }

    /// Returns the update schedule, if the component wants to be time-stepped.
    fn update_schedule(&self) -> Option<UpdateSchedule> {
        None
    }
}

/// A component that owns a slice of the shared continuous state vector.
///
/// Integrators concatenate the slices of all registered contributors in
/// registration order. Each contributor reads and writes its slice at the
/// given `offset` into a buffer owned by the integrator.
pub trait StateContributor {
    /// Returns the number of scalar state variables.
    fn count(&self) -> usize;

    /// Copies the current state into `buffer[offset..offset + count]`.
    fn read_state(&self, buffer: &mut [f64], offset: usize);

    /// Replaces the current state with `buffer[offset..offset + count]`.
    fn write_state(&mut self, buffer: &[f64], offset: usize);

    /// Computes the rates of change for the current state into
    /// `buffer[offset..offset + count]`.
    fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize);
}

/// How the kernel schedules updates for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateMethod {
    /// No automatic updates.
    None,

    /// A single update at the start time.
    Once,

    /// An update at the start time and then every time step.
    #[default]
    Recurring,
}

/// The update schedule a time-stepped component declares.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateSchedule {
    /// Interval between recurring updates. Recurrence stops when not positive.
    pub time_step: f64,

    /// Priority of the scheduled time events.
    pub priority: i32,

    /// Whether and how often updates are scheduled.
    pub method: UpdateMethod,
}

impl UpdateSchedule {
    /// Creates a recurring schedule with the given time step and the default
    /// update priority.
    #[must_use]
    pub fn every(time_step: f64) -> Self {
        Self {
            time_step,
            ..Self::default()
        }
    }

    /// Creates a schedule with a single update at the start time.
    #[must_use]
    pub fn once() -> Self {
        Self {
            method: UpdateMethod::Once,
            ..Self::default()
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for UpdateSchedule {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            priority: priority::UPDATE,
            method: UpdateMethod::Recurring,
        }
    }
}
