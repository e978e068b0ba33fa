//! Fixed-step explicit Euler.
//!
//! Each call to [`Integrator::step`] takes one step of size
//! `h = min(time_step, end_time - current_time)`:
//!
//! ```text
//! state_{n+1} = state_n + derivative_n * h
//! ```

use crate::{Integrator, IntegratorError, Roster, StateSystem};

/// Forward Euler integrator.
#[derive(Debug, Clone, Default)]
pub struct Euler {
    roster: Roster,
    state: Vec<f64>,
    derivatives: Vec<f64>,
    next: Vec<f64>,
}

impl Euler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an integrator with the given step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `time_step` is not positive and finite.
    pub fn with_time_step(time_step: f64) -> Result<Self, IntegratorError> {
        let mut euler = Self::new();
        euler.set_time_step(time_step)?;
        Ok(euler)
    }
}

impl Integrator for Euler {
    fn name(&self) -> &str {
        "euler"
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn set_state_length(&mut self, len: usize) {
        self.state.resize(len, 0.0);
        self.derivatives.resize(len, 0.0);
        self.next.resize(len, 0.0);
    }

    fn step(
        &mut self,
        system: &mut dyn StateSystem,
        current_time: &mut f64,
        end_time: f64,
    ) -> Result<(), IntegratorError> {
        let remaining = end_time - *current_time;
        if remaining <= 0.0 {
            return Ok(());
        }

        if self.sync_state_length(system)? == 0 {
            *current_time = end_time;
            return Ok(());
        }

        let time_step = self.roster.time_step();
        let h = time_step.min(remaining);

        self.roster.read_state(system, &mut self.state)?;
        self.roster.read_derivatives(system, &mut self.derivatives)?;

        for ((next, y), d) in self.next.iter_mut().zip(&self.state).zip(&self.derivatives) {
            *next = y + h * d;
        }
        self.roster.write_state(system, &self.next)?;

        // Land exactly on the end time when the step was clipped.
        *current_time = if time_step < remaining {
            *current_time + h
        } else {
            end_time
        };

        Ok(())
    }

    fn step_back(&mut self, system: &mut dyn StateSystem) -> Result<(), IntegratorError> {
        self.roster.write_state(system, &self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use skein_core::ComponentId;

    use crate::fixtures::{Bench, Growth};

    // --- Test fixtures ---

    fn setup(value: f64, rate: f64, time_step: f64) -> (Euler, Bench, ComponentId) {
        let mut bench = Bench::new();
        let id = bench.insert(Growth::new(value, rate));
        let mut euler = Euler::with_time_step(time_step).expect("valid step");
        euler.add(id, bench.get_mut(id)).expect("contributes state");
        (euler, bench, id)
    }

    // --- Tests ---

    #[test]
    fn single_step_is_deterministic() {
        let (mut euler, mut bench, id) = setup(2.0, 0.5, 0.1);
        let mut time = 0.0;

        euler.step(&mut bench, &mut time, 10.0).expect("step succeeds");

        assert_relative_eq!(bench.value(id), 2.0 + 0.1 * 1.0);
        assert_relative_eq!(time, 0.1);
    }

    #[test]
    fn exponential_growth_with_unit_steps() {
        let (mut euler, mut bench, id) = setup(1.0, 0.1, 1.0);
        let mut time = 0.0;

        euler.step(&mut bench, &mut time, 5.0).expect("step succeeds");
        assert_relative_eq!(bench.value(id), 1.1);
        euler.step(&mut bench, &mut time, 5.0).expect("step succeeds");
        assert_relative_eq!(bench.value(id), 1.21);
        assert_relative_eq!(time, 2.0);
    }

    #[test]
    fn clips_to_end_time() {
        let (mut euler, mut bench, id) = setup(1.0, 1.0, 1.0);
        let mut time = 0.0;

        euler.step(&mut bench, &mut time, 0.25).expect("step succeeds");

        assert_eq!(time, 0.25);
        assert_relative_eq!(bench.value(id), 1.25);
    }

    #[test]
    fn step_back_restores_previous_state() {
        let (mut euler, mut bench, id) = setup(3.0, 1.0, 0.5);
        let mut time = 0.0;

        euler.step(&mut bench, &mut time, 1.0).expect("step succeeds");
        assert_relative_eq!(bench.value(id), 4.5);

        euler.step_back(&mut bench).expect("member resolves");
        assert_relative_eq!(bench.value(id), 3.0);
    }

    #[test]
    fn empty_roster_jumps_to_end_time() {
        let mut euler = Euler::new();
        let mut bench = Bench::new();
        let mut time = 1.0;

        euler.step(&mut bench, &mut time, 4.0).expect("nothing to integrate");

        assert_eq!(time, 4.0);
    }

    #[test]
    fn buffers_follow_state_length() {
        let (mut euler, mut bench, _) = setup(1.0, 1.0, 0.1);
        let second = bench.insert(Growth::new(10.0, -1.0));
        euler.add(second, bench.get_mut(second)).expect("contributes state");
        let mut time = 0.0;

        euler.step(&mut bench, &mut time, 1.0).expect("step succeeds");

        assert_eq!(euler.roster().state_len(), 2);
        assert_relative_eq!(bench.value(second), 9.0);
    }
}
