mod error;
mod roster;

pub use error::IntegratorError;
pub use roster::Roster;

use skein_core::{Component, ComponentId, StateContributor};

/// Resolves component ids to their state-contributor capability.
///
/// The kernel's component table implements this so an integrator can read
/// and write state without owning the components.
pub trait StateSystem {
    /// Returns the contributor registered under `id`, if it is available.
    fn contributor(&mut self, id: ComponentId) -> Option<&mut dyn StateContributor>;
}

/// A numerical integrator over the concatenated state of its members.
///
/// Implementations keep their members and numeric settings in a [`Roster`]
/// and provide [`step`](Integrator::step) and
/// [`step_back`](Integrator::step_back); everything else has a default
/// implementation that delegates to the roster.
pub trait Integrator {
    /// Returns the algorithm name for logs.
    fn name(&self) -> &str;

    fn roster(&self) -> &Roster;

    fn roster_mut(&mut self) -> &mut Roster;

    /// Registers a state contributor.
    ///
    /// Adding a member twice has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::NotStateContributor`] if the component does
    /// not expose the state-contributor capability.
    fn add(&mut self, id: ComponentId, component: &mut dyn Component) -> Result<(), IntegratorError> {
        self.roster_mut().add(id, component)
    }

    /// Unregisters a member, returning false if it was not registered.
    fn remove(&mut self, id: ComponentId) -> bool {
        self.roster_mut().remove(id)
    }

    fn clear(&mut self) {
        self.roster_mut().clear();
    }

    /// Returns the members in registration order.
    fn members(&self) -> &[ComponentId] {
        self.roster().members()
    }

    /// Returns the nominal step size.
    fn time_step(&self) -> f64 {
        self.roster().time_step()
    }

    /// Sets the nominal step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `time_step` is not positive and finite.
    fn set_time_step(&mut self, time_step: f64) -> Result<(), IntegratorError> {
        self.roster_mut().set_time_step(time_step)
    }

    fn tolerance(&self) -> f64 {
        self.roster().tolerance()
    }

    /// Sets the target local error for adaptive algorithms.
    ///
    /// # Errors
    ///
    /// Returns an error if `tolerance` is not positive and finite.
    fn set_tolerance(&mut self, tolerance: f64) -> Result<(), IntegratorError> {
        self.roster_mut().set_tolerance(tolerance)
    }

    /// Called when a run starts.
    fn start_run(&mut self) {}

    /// Called when a run ends.
    fn end_run(&mut self) {}

    /// Resizes scratch buffers after the total state length changes.
    fn set_state_length(&mut self, len: usize);

    /// Recounts the members' state and resizes buffers if the total changed.
    ///
    /// Returns the total state length.
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    fn sync_state_length(&mut self, system: &mut dyn StateSystem) -> Result<usize, IntegratorError> {
        let (len, changed) = self.roster_mut().count_states(system)?;
        if changed {
            self.set_state_length(len);
        }
        Ok(len)
    }

    /// Advances at most one internal step without passing `end_time`.
    ///
    /// On success `current_time` holds the time reached and every member
    /// holds the state for that time.
    ///
    /// # Errors
    ///
    /// Returns an error if a member cannot be resolved or the algorithm fails.
    fn step(
        &mut self,
        system: &mut dyn StateSystem,
        current_time: &mut f64,
        end_time: f64,
    ) -> Result<(), IntegratorError>;

    /// Restores the state held at the start of the last call to
    /// [`step`](Integrator::step).
    ///
    /// # Errors
    ///
    /// Returns [`IntegratorError::MissingContributor`] if a member cannot be
    /// resolved.
    fn step_back(&mut self, system: &mut dyn StateSystem) -> Result<(), IntegratorError>;
}
