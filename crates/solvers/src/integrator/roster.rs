use skein_core::{Component, ComponentId, StateContributor};

use super::{IntegratorError, StateSystem};

const DEFAULT_TIME_STEP: f64 = 0.01;
const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Bookkeeping shared by all integrators.
///
/// Holds the registered members in order, the nominal step size, the
/// tolerance, and the last known total state length. Members' slices are
/// laid out back to back in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    members: Vec<ComponentId>,
    time_step: f64,
    tolerance: f64,
    state_len: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            time_step: DEFAULT_TIME_STEP,
            tolerance: DEFAULT_TOLERANCE,
            state_len: 0,
        }
    }
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member after checking its capability.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::NotStateContributor`] if the component does
    /// not contribute state.
    pub fn add(&mut self, id: ComponentId, component: &mut dyn Component) -> Result<(), IntegratorError> {
        if component.state_contributor().is_none() {
            return Err(IntegratorError::NotStateContributor(id));
        }
        if !self.members.contains(&id) {
            self.members.push(id);
        }
        Ok(())
    }

    pub fn remove(&mut self, id: ComponentId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != id);
        self.members.len() != before
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    #[must_use]
    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// # Errors
    ///
    /// Returns an error if `time_step` is not positive and finite.
    pub fn set_time_step(&mut self, time_step: f64) -> Result<(), IntegratorError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(IntegratorError::InvalidTimeStep(time_step));
        }
        self.time_step = time_step;
        Ok(())
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// # Errors
    ///
    /// Returns an error if `tolerance` is not positive and finite.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), IntegratorError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(IntegratorError::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        Ok(())
    }

    /// Returns the last counted total state length.
    #[must_use]
    pub fn state_len(&self) -> usize {
        self.state_len
    }

    /// Recounts the total state length.
    ///
    /// Returns the new length and whether it differs from the previous count.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    pub fn count_states(&mut self, system: &mut dyn StateSystem) -> Result<(usize, bool), IntegratorError> {
        let mut len = 0;
        for &id in &self.members {
            len += resolve(system, id)?.count();
        }
        let changed = len != self.state_len;
        self.state_len = len;
        Ok((len, changed))
    }

    /// Copies every member's state into `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    pub fn read_state(&self, system: &mut dyn StateSystem, buffer: &mut [f64]) -> Result<(), IntegratorError> {
        let mut offset = 0;
        for &id in &self.members {
            let contributor = resolve(system, id)?;
            contributor.read_state(buffer, offset);
            offset += contributor.count();
        }
        Ok(())
    }

    /// Writes `buffer` back into every member's state.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    pub fn write_state(&self, system: &mut dyn StateSystem, buffer: &[f64]) -> Result<(), IntegratorError> {
        let mut offset = 0;
        for &id in &self.members {
            let contributor = resolve(system, id)?;
            contributor.write_state(buffer, offset);
            offset += contributor.count();
        }
        Ok(())
    }

    /// Collects every member's rates of change into `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    pub fn read_derivatives(&self, system: &mut dyn StateSystem, buffer: &mut [f64]) -> Result<(), IntegratorError> {
        let mut offset = 0;
        for &id in &self.members {
            let contributor = resolve(system, id)?;
            contributor.read_derivatives(buffer, offset);
            offset += contributor.count();
        }
        Ok(())
    }
}

fn resolve(
    system: &mut dyn StateSystem,
    id: ComponentId,
) -> Result<&mut dyn StateContributor, IntegratorError> {
    system
        .contributor(id)
        .ok_or(IntegratorError::MissingContributor(id))
}
