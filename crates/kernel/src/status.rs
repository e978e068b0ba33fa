use std::fmt;

/// The run state of a [`Simulation`](crate::Simulation).
///
/// A run moves `Idle -> Starting -> Running -> Stopping -> Idle`. `Error` is
/// only entered through [`Simulation::mark_error`](crate::Simulation::mark_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
    Error,
}

impl Status {
    /// Returns true while a run is starting or running.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
