use skein_core::{ComponentId, EventInfo, Probe};

use crate::Status;

/// What a [`Notice`] reports.
#[derive(Debug, Clone, Copy)]
pub enum NoticeKind<'a> {
    /// The run status changed to the given value.
    StatusChanged(Status),

    /// An event is about to be dispatched to its target.
    BeforeEvent(&'a EventInfo),

    /// An event has been handled by its target.
    AfterEvent(&'a EventInfo),

    /// The integrator completed a step, after any state event was localized.
    IntegrationStep,

    /// Component outputs are current for the notice time.
    Output,

    /// A time event and the state events it triggered have been handled.
    AfterTimeEvent,

    /// A component emitted a log message.
    Log {
        source: ComponentId,
        message: &'a str,
    },
}

/// A notification delivered to every observer of a simulation.
#[derive(Clone, Copy)]
pub struct Notice<'a> {
    /// Simulation time when the notice was emitted.
    pub time: f64,

    /// Run status when the notice was emitted.
    pub status: Status,

    pub kind: NoticeKind<'a>,

    probe: &'a dyn Probe,
}

impl<'a> Notice<'a> {
    pub(crate) fn new(time: f64, status: Status, kind: NoticeKind<'a>, probe: &'a dyn Probe) -> Self {
        Self {
            time,
            status,
            kind,
            probe,
        }
    }

    /// Reads a component output at the notice time.
    #[must_use]
    pub fn output(&self, component: ComponentId, name: &str) -> Option<f64> {
        self.probe.output(component, name)
    }

    #[must_use]
    pub fn probe(&self) -> &'a dyn Probe {
        self.probe
    }
}

impl std::fmt::Debug for Notice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notice")
            .field("time", &self.time)
            .field("status", &self.status)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Control actions an observer can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the run at the next loop boundary.
    StopEarly,
}
