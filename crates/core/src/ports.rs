use thiserror::Error;

/// Errors raised when building a port declaration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortsError {
    #[error("port name `{0}` is declared more than once")]
    Duplicate(String),

    #[error("port names must not be empty")]
    EmptyName,
}

/// A state variable paired with the name of its rate of change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBinding {
    pub state: String,
    pub rate: String,
}

/// The named inputs, outputs, and state/rate pairs a component declares.
///
/// The kernel consults only these lists: inputs gate
/// [`set_input`](crate::Component::set_input), and outputs plus states and
/// rates are what a [`Probe`](crate::Probe) may read.
///
/// ```
/// use skein_core::Ports;
///
/// let ports = Ports::builder()
///     .input("rgr")
///     .state("size", "growth")
///     .build()
///     .expect("names are unique");
///
/// assert!(ports.has_input("rgr"));
/// assert!(ports.is_readable("size"));
/// assert!(ports.is_readable("growth"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ports {
    inputs: Vec<String>,
    outputs: Vec<String>,
    states: Vec<StateBinding>,
}

static EMPTY: Ports = Ports {
    inputs: Vec::new(),
    outputs: Vec::new(),
    states: Vec::new(),
};

impl Ports {
    #[must_use]
    pub fn builder() -> PortsBuilder {
        PortsBuilder::default()
    }

    /// Returns a shared declaration with no ports.
    #[must_use]
    pub fn empty() -> &'static Ports {
        &EMPTY
    }

    #[must_use]
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|n| n == name)
    }

    /// Returns true if a probe may read `name`: an output, state, or rate.
    #[must_use]
    pub fn is_readable(&self, name: &str) -> bool {
        self.readable().any(|n| n == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(String::as_str)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(String::as_str)
    }

    pub fn states(&self) -> impl Iterator<Item = &StateBinding> {
        self.states.iter()
    }

    /// Iterates outputs, then state names, then rate names.
    pub fn readable(&self) -> impl Iterator<Item = &str> {
        self.outputs()
            .chain(self.states.iter().map(|b| b.state.as_str()))
            .chain(self.states.iter().map(|b| b.rate.as_str()))
    }
}

/// Builds a [`Ports`] declaration.
#[derive(Debug, Clone, Default)]
pub struct PortsBuilder {
    ports: Ports,
}

impl PortsBuilder {
    #[must_use]
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.ports.inputs.push(name.into());
        self
    }

    #[must_use]
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.ports.outputs.push(name.into());
        self
    }

    /// Declares a state variable and the name of its rate of change.
    #[must_use]
    pub fn state(mut self, state: impl Into<String>, rate: impl Into<String>) -> Self {
        self.ports.states.push(StateBinding {
            state: state.into(),
            rate: rate.into(),
        });
        self
    }

    /// Validates and returns the declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if any name is empty or declared twice.
    pub fn build(self) -> Result<Ports, PortsError> {
        let ports = self.ports;
        let mut seen: Vec<&str> = Vec::new();
        for name in ports.inputs().chain(ports.readable()) {
            if name.is_empty() {
                return Err(PortsError::EmptyName);
            }
            if seen.contains(&name) {
                return Err(PortsError::Duplicate(name.to_owned()));
            }
            seen.push(name);
        }
        Ok(ports)
    }
}
