//! A ball dropped from one meter, bouncing until the stop time.
//!
//! # Usage
//!
//! ```text
//! cargo run --example bouncing_ball
//! cargo run --example bouncing_ball -- 0.0001
//! cargo run --example bouncing_ball --features plot
//! ```
//!
//! The optional argument is the state-event accuracy (default `0.001`).
//! Smaller values pin each bounce closer to the floor at the cost of more
//! bisection steps. With the `plot` feature the height is shown in a window.

use std::error::Error;

use skein_core::{
    Component, ComponentError, Context, EventInfo, Ports, Probe, StateContributor, StateEvent,
};
use skein_kernel::{Action, Config, Notice, NoticeKind, Simulation};
use skein_observers::{Recorder, Sampler, Tracer};
use skein_solvers::rkck::Rkck;

const GRAVITY: f64 = 9.81;
const FLOOR: f64 = 0.05;
const RESTITUTION: f64 = 0.9;

fn main() -> Result<(), Box<dyn Error>> {
    let accuracy = std::env::args()
        .nth(1)
        .as_deref()
        .map(str::parse::<f64>)
        .transpose()?
        .unwrap_or(1e-3);

    let config = Config::new(0.0, 15.0, accuracy)?;
    let mut sim = Simulation::new(config, Rkck::with_settings(0.01, 1e-6)?);
    let ball = sim.add(Ball::new(1.0)?)?;

    let recorder = Recorder::new().track(ball, "height");
    let sampler = Sampler::every(0.5)?.track(ball, "height");
    let every_half_second = sampler.log();
    sim.add(sampler)?;
    sim.add_observer(recorder.clone());
    sim.add_observer(Tracer::new().quiet_steps());

    sim.add_observer(move |notice: &Notice<'_>| -> Option<Action> {
        match notice.kind {
            NoticeKind::AfterEvent(event) if event.target() == Some(ball) => {
                println!("bounce at t = {:.4}", notice.time);
            }
            _ => {}
        }
        None
    });

    sim.run()?;

    let heights = recorder.log().series(ball, "height").unwrap_or_default();
    let tops = peaks(&heights);
    println!("{} integration steps, {} peaks", heights.len(), tops.len());
    for (time, height) in tops.iter().take(10) {
        println!("  peak {height:.4} m at t = {time:.3}");
    }
    println!("sampled every 0.5 s: {} rows", every_half_second.len());

    #[cfg(feature = "plot")]
    skein_observers::Chart::from_log(&recorder.log()).show(
        skein_observers::ShowConfig::new()
            .title("Bouncing ball")
            .y_label("height")
            .legend(),
    )?;

    Ok(())
}

/// Returns the local maxima of a series.
fn peaks(series: &[(f64, f64)]) -> Vec<(f64, f64)> {
    series
        .windows(3)
        .filter(|w| w[1].1 >= w[0].1 && w[1].1 > w[2].1)
        .map(|w| w[1])
        .collect()
}

// --- Model -------------------------------------------------------------------

struct Ball {
    ports: Ports,
    height: f64,
    velocity: f64,
}

impl Ball {
    fn new(height: f64) -> Result<Self, Box<dyn Error>> {
        let ports = Ports::builder().state("height", "velocity").build()?;
        Ok(Self {
            ports,
            height,
            velocity: 0.0,
        })
    }

    fn watch_floor(ctx: &mut dyn Context) -> Result<(), ComponentError> {
        let me = ctx.me();
        let hit = StateEvent::new(move |probe: &dyn Probe, _time: f64| {
            let height = probe.output(me, "height").unwrap_or(f64::INFINITY);
            let velocity = probe.output(me, "velocity").unwrap_or(0.0);
            height < FLOOR && velocity < 0.0
        });
        ctx.watch(hit.with_source(me).with_target(me))?;
        Ok(())
    }
}

impl Component for Ball {
    fn name(&self) -> &str {
        "ball"
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn output(&self, name: &str) -> Option<f64> {
        match name {
            "height" => Some(self.height),
            "velocity" => Some(self.velocity),
            _ => None,
        }
    }

    fn start_run(&mut self, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        Self::watch_floor(ctx)
    }

    fn handle_event(&mut self, _event: &EventInfo, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        self.velocity *= -RESTITUTION;
        ctx.log(&format!("bounced at {:.3} m", self.height));
        Self::watch_floor(ctx)
    }

    fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
        Some(self)
    }
}

impl StateContributor for Ball {
    fn count(&self) -> usize {
        2
    }

    fn read_state(&self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.height;
        buffer[offset + 1] = self.velocity;
    }

    fn write_state(&mut self, buffer: &[f64], offset: usize) {
        self.height = buffer[offset];
        self.velocity = buffer[offset + 1];
    }

    fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.velocity;
        buffer[offset + 1] = -GRAVITY;
    }
}
