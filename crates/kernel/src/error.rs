use std::fmt;

use skein_core::{ComponentError, ComponentId, EventError, EventId};
use skein_solvers::IntegratorError;
use thiserror::Error;

use crate::{ConfigError, Status};

/// The lifecycle phase in which a component failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StartRun,
    EndRun,
    HandleEvent,
    SetInput,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartRun => "start_run",
            Self::EndRun => "end_run",
            Self::HandleEvent => "handle_event",
            Self::SetInput => "set_input",
        };
        f.write_str(name)
    }
}

/// Errors raised by a [`Simulation`](crate::Simulation).
#[derive(Debug, Error)]
pub enum SimError {
    #[error("cannot {operation} while {status}")]
    InvalidStatus {
        operation: &'static str,
        status: Status,
    },

    #[error("event {0} has no target")]
    MissingTarget(EventId),

    #[error("cannot schedule an event at {time} before the current time {now}")]
    RetroactiveEvent { time: f64, now: f64 },

    #[error("unknown component {0}")]
    UnknownComponent(ComponentId),

    #[error("component {0} is busy handling a callback")]
    ComponentBusy(ComponentId),

    #[error("component {id} has no port named `{name}`")]
    UnknownPort { id: ComponentId, name: String },

    #[error("component `{name}` ({id}) failed in {phase}")]
    Component {
        id: ComponentId,
        name: String,
        phase: Phase,
        #[source]
        source: ComponentError,
    },

    #[error("integrator error: {0}")]
    Integrator(#[from] IntegratorError),

    #[error("invalid event: {0}")]
    Event(#[from] EventError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("state events kept triggering after {0} were handled")]
    StateEventCascade(usize),
}
