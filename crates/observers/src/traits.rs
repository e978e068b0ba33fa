//! Capability traits for notice-agnostic observers.
//!
//! These traits abstract over the notice and action types an observer sees,
//! so an observer can be written once and tested without a simulation.
//!
//! # Example
//!
//! ```rust
//! use skein_core::Observer;
//! use skein_observers::traits::{CanStopEarly, HasTime};
//!
//! /// Stops a run once it passes a deadline.
//! struct Deadline(f64);
//!
//! impl<E: HasTime, A: CanStopEarly> Observer<E, A> for Deadline {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.time() >= self.0).then(A::stop_early)
//!     }
//! }
//!
//! let mut sim = skein_kernel::Simulation::default();
//! sim.add_observer(Deadline(2.0));
//! sim.run().expect("run completes");
//! assert!(sim.now() <= 5.0);
//! ```

use skein_kernel::{Action, Notice};

/// A notice that carries the simulation time it was emitted at.
pub trait HasTime {
    fn time(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the run early.
    fn stop_early() -> Self;
}

impl HasTime for Notice<'_> {
    fn time(&self) -> f64 {
        self.time
    }
}

impl CanStopEarly for Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use skein_core::{Component, Observer, Ports, StateContributor};
    use skein_kernel::{Config, Simulation};
    use skein_solvers::euler::Euler;

    // --- Test fixtures ---

    struct Tick(f64);

    impl HasTime for Tick {
        fn time(&self) -> f64 {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    enum Stop {
        Now,
    }

    impl CanStopEarly for Stop {
        fn stop_early() -> Self {
            Self::Now
        }
    }

    /// Stops once the time has passed a limit.
    struct Deadline(f64);

    impl<E: HasTime, A: CanStopEarly> Observer<E, A> for Deadline {
        fn observe(&mut self, event: &E) -> Option<A> {
            (event.time() >= self.0).then(A::stop_early)
        }
    }

    /// A component with continuous state so the integrator takes real steps.
    struct Clock {
        ports: Ports,
        elapsed: f64,
    }

    impl Component for Clock {
        fn name(&self) -> &str {
            "clock"
        }

        fn ports(&self) -> &Ports {
            &self.ports
        }

        fn output(&self, name: &str) -> Option<f64> {
            match name {
                "elapsed" => Some(self.elapsed),
                "rate" => Some(1.0),
                _ => None,
            }
        }

        fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
            Some(self)
        }
    }

    impl StateContributor for Clock {
        fn count(&self) -> usize {
            1
        }

        fn read_state(&self, buffer: &mut [f64], offset: usize) {
            buffer[offset] = self.elapsed;
        }

        fn write_state(&mut self, buffer: &[f64], offset: usize) {
            self.elapsed = buffer[offset];
        }

        fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize) {
            buffer[offset] = 1.0;
        }
    }

    // --- Tests ---

    #[test]
    fn deadline_works_with_any_notice_and_action() {
        let mut deadline = Deadline(1.0);
        assert_eq!(deadline.observe(&Tick(0.5)), None::<Stop>);
        assert_eq!(deadline.observe(&Tick(1.0)), Some(Stop::Now));
    }

    #[test]
    fn deadline_stops_a_simulation() {
        let config = Config::new(0.0, 10.0, 0.01).expect("valid config");
        let mut sim = Simulation::new(config, Euler::with_time_step(0.25).expect("valid step"));
        let ports = Ports::builder()
            .state("elapsed", "rate")
            .build()
            .expect("unique names");
        sim.add(Clock { ports, elapsed: 0.0 }).expect("registered");
        sim.add_observer(Deadline(1.5));

        sim.run().expect("run completes");
        assert_relative_eq!(sim.now(), 1.5);
    }
}
