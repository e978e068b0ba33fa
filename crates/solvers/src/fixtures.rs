//! Components and a minimal state system shared by the integrator tests.

use skein_core::{Component, ComponentId, StateContributor};

use crate::StateSystem;

/// Exponential growth: `dy/dt = rate * y`.
#[derive(Debug, Clone, Copy)]
pub struct Growth {
    pub value: f64,
    pub rate: f64,
}

impl Growth {
    pub fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }
}

impl Component for Growth {
    fn name(&self) -> &str {
        "growth"
    }

    fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
        Some(self)
    }
}

impl StateContributor for Growth {
    fn count(&self) -> usize {
        1
    }

    fn read_state(&self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.value;
    }

    fn write_state(&mut self, buffer: &[f64], offset: usize) {
        self.value = buffer[offset];
    }

    fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.rate * self.value;
    }
}

/// A component without state.
pub struct Inert;

impl Component for Inert {
    fn name(&self) -> &str {
        "inert"
    }
}

/// A state system over a list of [`Growth`] components.
#[derive(Debug, Default)]
pub struct Bench {
    members: Vec<(ComponentId, Growth)>,
}

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, growth: Growth) -> ComponentId {
        let id = ComponentId::next();
        self.members.push((id, growth));
        id
    }

    pub fn get_mut(&mut self, id: ComponentId) -> &mut Growth {
        self.members
            .iter_mut()
            .find(|(member, _)| *member == id)
            .map(|(_, growth)| growth)
            .expect("member exists")
    }

    pub fn value(&self, id: ComponentId) -> f64 {
        self.members
            .iter()
            .find(|(member, _)| *member == id)
            .map(|(_, growth)| growth.value)
            .expect("member exists")
    }
}

impl StateSystem for Bench {
    fn contributor(&mut self, id: ComponentId) -> Option<&mut dyn StateContributor> {
        self.members
            .iter_mut()
            .find(|(member, _)| *member == id)
            .map(|(_, growth)| growth as &mut dyn StateContributor)
    }
}
