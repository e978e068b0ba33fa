use skein_core::{ComponentId, Observer};
use skein_kernel::{Notice, NoticeKind, Simulation};

use crate::{Column, SampleLog};

/// An observer that snapshots tracked outputs on every output notice.
///
/// Output notices follow the initial state of a run and every integration
/// step, so the recorded series has the integrator's resolution. Use a
/// [`Sampler`](crate::Sampler) for a fixed interval instead.
///
/// The recorder never asks the run to stop.
///
/// # Example
///
/// ```rust
/// use skein_kernel::Simulation;
/// use skein_observers::Recorder;
///
/// let mut sim = Simulation::default();
/// let recorder = Recorder::new();
/// sim.add_observer(recorder.clone());
/// sim.run().expect("run completes");
///
/// // One row for the initial state and one per integration step.
/// assert_eq!(recorder.log().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: SampleLog,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks one output, state, or rate of a component.
    #[must_use]
    pub fn track(self, component: ComponentId, port: impl Into<String>) -> Self {
        self.log.push_column(Column::new(component, port));
        self
    }

    /// Tracks every readable port of every component currently registered.
    #[must_use]
    pub fn track_all(self, sim: &Simulation) -> Self {
        for column in Column::all_of(sim) {
            self.log.push_column(column);
        }
        self
    }

    /// Returns a handle to the recorded samples.
    #[must_use]
    pub fn log(&self) -> SampleLog {
        self.log.clone()
    }
}

impl<'a, A> Observer<Notice<'a>, A> for Recorder {
    fn observe(&mut self, notice: &Notice<'a>) -> Option<A> {
        if let NoticeKind::Output = notice.kind {
            self.log.record(notice.time, notice.probe());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use skein_core::{Component, Ports, StateContributor};
    use skein_kernel::Config;
    use skein_solvers::euler::Euler;

    // --- Test fixtures ---

    /// Drains at a rate proportional to its level.
    struct Tank {
        ports: Ports,
        level: f64,
    }

    impl Tank {
        fn new(level: f64) -> Self {
            let ports = Ports::builder()
                .output("full")
                .state("level", "outflow")
                .build()
                .expect("unique names");
            Self { ports, level }
        }
    }

    impl Component for Tank {
        fn name(&self) -> &str {
            "tank"
        }

        fn ports(&self) -> &Ports {
            &self.ports
        }

        fn output(&self, name: &str) -> Option<f64> {
            match name {
                "full" => Some(if self.level >= 1.0 { 1.0 } else { 0.0 }),
                "level" => Some(self.level),
                "outflow" => Some(-0.5 * self.level),
                _ => None,
            }
        }

        fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
            Some(self)
        }
    }

    impl StateContributor for Tank {
        fn count(&self) -> usize {
            1
        }

        fn read_state(&self, buffer: &mut [f64], offset: usize) {
            buffer[offset] = self.level;
        }

        fn write_state(&mut self, buffer: &[f64], offset: usize) {
            self.level = buffer[offset];
        }

        fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize) {
            buffer[offset] = -0.5 * self.level;
        }
    }

    fn simulation(stop_time: f64) -> Simulation {
        let config = Config::new(0.0, stop_time, 0.01).expect("valid config");
        Simulation::new(config, Euler::with_time_step(0.5).expect("valid step"))
    }

    // --- Tests ---

    #[test]
    fn records_each_integration_step() {
        let mut sim = simulation(1.0);
        let tank = sim.add(Tank::new(2.0)).expect("registered");
        let recorder = Recorder::new().track(tank, "level");
        sim.add_observer(recorder.clone());

        sim.run().expect("run completes");

        let series = recorder.log().series(tank, "level").expect("tracked");
        let expected = [(0.0, 2.0), (0.5, 1.5), (1.0, 1.125)];
        assert_eq!(series.len(), expected.len());
        for ((time, level), (expected_time, expected_level)) in series.iter().zip(expected) {
            assert_relative_eq!(*time, expected_time);
            assert_relative_eq!(*level, expected_level);
        }
    }

    #[test]
    fn tracks_every_readable_port() {
        let mut sim = simulation(0.5);
        sim.add(Tank::new(1.0)).expect("registered");
        let recorder = Recorder::new().track_all(&sim);
        sim.add_observer(recorder.clone());

        sim.run().expect("run completes");

        let log = recorder.log();
        let labels: Vec<_> = log.columns().into_iter().map(|column| column.label).collect();
        assert_eq!(labels, ["tank.full", "tank.level", "tank.outflow"]);

        let last = log.samples().pop().expect("recorded");
        assert_eq!(last.values[0], Some(0.0));
        assert_relative_eq!(last.values[1].expect("readable"), 0.75);
        assert_relative_eq!(last.values[2].expect("readable"), -0.375);
    }
}
