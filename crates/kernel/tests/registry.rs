//! Registration, port access, and moving components between simulations.

mod common;

use std::{cell::RefCell, rc::Rc};

use approx::assert_relative_eq;
use common::{Population, Ramp, Recorder, shared};
use skein_core::{Component, ComponentError, Context, ScheduleError, TimeEvent};
use skein_kernel::{Config, Phase, SimError, Simulation, Status};
use skein_solvers::{Integrator, euler::Euler, rkck::Rkck};

#[test]
fn ports_gate_inputs_and_outputs() {
    let mut sim = Simulation::default();
    let population = sim.add(Population::new(2.0)).expect("registered");

    sim.set_input(population, "rgr", 0.5).expect("declared input");
    assert_relative_eq!(sim.output(population, "size").expect("state"), 2.0);
    assert_relative_eq!(sim.output(population, "growth").expect("rate"), 1.0);

    assert!(matches!(
        sim.set_input(population, "size", 1.0),
        Err(SimError::UnknownPort { ref name, .. }) if name == "size"
    ));
    assert!(matches!(
        sim.output(population, "rgr"),
        Err(SimError::UnknownPort { .. })
    ));
    assert!(matches!(
        sim.set_input(population, "rgr", f64::NAN),
        Err(SimError::Component {
            phase: Phase::SetInput,
            ..
        })
    ));

    let ports = sim.ports(population).expect("registered");
    assert!(ports.has_input("rgr"));
    assert!(ports.is_readable("growth"));
}

#[test]
fn lookups_follow_registration_order() {
    let mut sim = Simulation::default();
    let first = sim.add(Ramp::new()).expect("registered");
    let second = sim.add(Population::new(1.0)).expect("registered");
    let third = sim.add(Ramp::new()).expect("registered");

    assert_eq!(sim.ids(), vec![first, second, third]);
    assert_eq!(sim.find("ramp"), Some(first));
    assert_eq!(sim.name(second), Some("population"));
    assert_eq!(sim.integrator().members(), [first, second, third]);

    sim.remove(first).expect("registered");
    assert_eq!(sim.find("ramp"), Some(third));
    assert_eq!(sim.integrator().members(), [second, third]);
    assert!(matches!(
        sim.remove(first),
        Err(SimError::UnknownComponent(id)) if id == first
    ));
}

#[test]
fn events_must_target_registered_components() {
    let mut sim = Simulation::default();
    let ramp = sim.add(Ramp::new()).expect("registered");
    sim.remove(ramp).expect("registered");

    let event = TimeEvent::new(1.0).expect("finite time").with_target(ramp);
    assert!(matches!(
        sim.register_time_event(event),
        Err(SimError::UnknownComponent(_))
    ));
}

#[test]
fn transfer_moves_state_and_events_stay_behind() {
    let mut from = Simulation::default();
    let mut to = Simulation::default();
    let hits = shared();
    let recorder = from.add(Recorder::new("recorder", &hits)).expect("registered");
    let population = from.add(Population::new(3.0)).expect("registered");
    from.register_time_event(
        TimeEvent::new(1.0)
            .expect("finite time")
            .with_target(recorder),
    )
    .expect("registered");

    let moved = from.transfer(population, &mut to).expect("transferred");
    let recorder = from.transfer(recorder, &mut to).expect("transferred");

    assert!(from.is_empty());
    assert!(from.time_events().is_empty());
    assert_eq!(to.len(), 2);
    assert_eq!(to.find("recorder"), Some(recorder));
    assert_relative_eq!(to.output(moved, "size").expect("state"), 3.0);
    assert_eq!(to.integrator().members(), [moved]);
}

#[test]
fn swapping_integrators_keeps_members() {
    let mut sim = Simulation::default();
    let population = sim.add(Population::new(1.0)).expect("registered");
    sim.add(Recorder::new("recorder", &shared())).expect("registered");

    let previous = sim.set_integrator(Box::new(Rkck::new())).expect("swapped");
    assert_eq!(previous.name(), Euler::new().name());
    assert_eq!(sim.integrator().name(), Rkck::new().name());
    assert_eq!(sim.integrator().members(), [population]);
}

#[test]
fn clear_ends_live_components() {
    let mut sim = Simulation::default();
    let ends = Rc::new(RefCell::new(0));
    for name in ["a", "b", "c"] {
        sim.add(Recorder::new(name, &shared()).count_ends(&ends))
            .expect("registered");
    }
    sim.add(Ramp::new()).expect("registered");

    sim.start_run().expect("run starts");
    sim.clear().expect("cleared");

    assert!(sim.is_empty());
    assert!(sim.integrator().members().is_empty());
    assert_eq!(*ends.borrow(), 3);
    sim.end_run().expect("run ends");
    assert_eq!(*ends.borrow(), 3);
}

/// Fails to start whenever it is started.
struct Stubborn;

impl Component for Stubborn {
    fn name(&self) -> &str {
        "stubborn"
    }

    fn start_run(&mut self, _ctx: &mut dyn Context) -> Result<(), ComponentError> {
        Err("not today".into())
    }
}

#[test]
fn failed_mid_run_registration_leaves_no_trace() {
    let mut sim = Simulation::default();
    sim.start_run().expect("run starts");

    let err = sim.add(Stubborn).expect_err("start fails");
    assert!(matches!(
        err,
        SimError::Component {
            phase: Phase::StartRun,
            ..
        }
    ));
    assert!(sim.is_empty());
    assert_eq!(sim.find("stubborn"), None);
    sim.end_run().expect("run ends");
}

/// Withdraws itself while starting, then reports a failure.
struct Quitter;

impl Component for Quitter {
    fn name(&self) -> &str {
        "quitter"
    }

    fn start_run(&mut self, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        ctx.remove_component(ctx.me())?;
        Err("changed my mind".into())
    }
}

#[test]
fn failed_registration_of_a_self_removed_component_reports_its_start_error() {
    let mut sim = Simulation::default();
    sim.start_run().expect("run starts");

    let err = sim.add(Quitter).expect_err("start fails");
    assert!(matches!(
        err,
        SimError::Component {
            phase: Phase::StartRun,
            ..
        }
    ));
    assert!(sim.is_empty());
    sim.end_run().expect("run ends");
}

/// Tries to register a component while the run is shutting down.
struct LateJoiner {
    outcome: Rc<RefCell<Option<Result<(), String>>>>,
}

impl Component for LateJoiner {
    fn name(&self) -> &str {
        "late joiner"
    }

    fn end_run(&mut self, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        let outcome = match ctx.add_component(Box::new(Ramp::new())) {
            Ok(_) => Ok(()),
            Err(ScheduleError::NotRunning) => Err("not running".to_owned()),
            Err(other) => Err(other.to_string()),
        };
        *self.outcome.borrow_mut() = Some(outcome);
        Ok(())
    }
}

#[test]
fn no_registration_while_stopping() {
    let mut sim = Simulation::default();
    let outcome = Rc::new(RefCell::new(None));
    sim.add(LateJoiner {
        outcome: Rc::clone(&outcome),
    })
    .expect("registered");

    sim.run().expect("run completes");

    assert_eq!(*outcome.borrow(), Some(Err("not running".to_owned())));
    assert_eq!(sim.len(), 1);
}

#[test]
fn configuration_changes_while_idle() {
    let mut sim = Simulation::default();
    sim.set_start_time(1.0).expect("idle");
    sim.set_stop_time(4.0).expect("idle");
    sim.set_accuracy(1e-3).expect("idle");

    assert_relative_eq!(sim.now(), 1.0);
    assert_eq!(sim.config(), &Config::new(1.0, 4.0, 1e-3).expect("valid config"));
    assert!(matches!(sim.set_stop_time(0.5), Err(SimError::Config(_))));

    sim.run().expect("run completes");
    assert_relative_eq!(sim.now(), 4.0);
    assert_eq!(sim.status(), Status::Idle);
}
