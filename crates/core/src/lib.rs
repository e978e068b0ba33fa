//! Core contracts and event machinery for the Skein simulation kernel.
//!
//! This crate defines the shared abstractions that integrators, the
//! simulation coordinator, and observers build on:
//!
//! - [`Component`]: a participant in a simulation run, with optional
//!   [`StateContributor`] and [`UpdateSchedule`] capabilities
//! - [`Ports`]: the explicit declaration of a component's named inputs,
//!   outputs, and state/rate pairs
//! - [`TimeEvent`], [`StateEvent`]: scheduled and condition-triggered events
//! - [`TimeEventQueue`], [`StateEventList`]: the two pending-event collections
//! - [`Context`]: the handle a component receives during its callbacks
//! - [`Probe`]: read access to component outputs
//! - [`Observer`]: receives notifications and optionally returns control actions

mod component;
mod context;
mod event;
mod id;
mod observer;
mod ports;
mod probe;
pub mod queue;

pub use component::{Component, ComponentError, StateContributor, UpdateMethod, UpdateSchedule, priority};
pub use context::{Context, ScheduleError};
pub use event::{EventError, EventInfo, Recurrence, StateCondition, StateEvent, TimeEvent};
pub use id::{ComponentId, EventId};
pub use observer::Observer;
pub use ports::{Ports, PortsBuilder, PortsError, StateBinding};
pub use probe::Probe;
pub use queue::{StateEventList, TimeEventQueue};
