//! Components shared by the kernel integration tests.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use skein_core::{
    Component, ComponentError, Context, EventInfo, Ports, Probe, StateContributor,
    StateEvent,
};

/// A log shared between a test and the components it drives.
pub type Shared<T> = Rc<RefCell<Vec<T>>>;

pub fn shared<T>() -> Shared<T> {
    Rc::new(RefCell::new(Vec::new()))
}

/// Exponential growth: `d(size)/dt = rgr * size`.
pub struct Population {
    ports: Ports,
    size: f64,
    rgr: f64,
}

impl Population {
    pub fn new(size: f64) -> Self {
        let ports = Ports::builder()
            .input("rgr")
            .state("size", "growth")
            .build()
            .expect("unique names");
        Self {
            ports,
            size,
            rgr: 0.0,
        }
    }
}

impl Component for Population {
    fn name(&self) -> &str {
        "population"
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn output(&self, name: &str) -> Option<f64> {
        match name {
            "size" => Some(self.size),
            "growth" => Some(self.rgr * self.size),
            _ => None,
        }
    }

    fn set_input(&mut self, name: &str, value: f64) -> Result<(), ComponentError> {
        match name {
            "rgr" if value.is_finite() => {
                self.rgr = value;
                Ok(())
            }
            _ => Err(format!("invalid value {value} for `{name}`").into()),
        }
    }

    fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
        Some(self)
    }
}

impl StateContributor for Population {
    fn count(&self) -> usize {
        1
    }

    fn read_state(&self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.size;
    }

    fn write_state(&mut self, buffer: &[f64], offset: usize) {
        self.size = buffer[offset];
    }

    fn read_derivatives(&mut self, buffer: &mut [f64], offset: usize) {
        buffer[offset] = self.rgr * self.size;
    }
}

/// A ball dropped from a height, bouncing when it reaches the floor.
pub struct Ball {
    ports: Ports,
    height: f64,
    velocity: f64,
    restitution: f64,
}

pub const GRAVITY: f64 = 9.81;
pub const FLOOR: f64 = 0.05;

impl Ball {
    pub fn new(height: f64) -> Self {
        let ports = Ports::builder()
            .state("height", "velocity")
            .build()
            .expect("unique names");
        Self {
            ports,
            height,
            velocity: 0.0,
            restitution: 0.9,
        }
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
        self.velocity = -self.velocity * self.restitution;
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

/// Rises at a constant unit rate from zero.
pub struct Ramp {
    ports: Ports,
    level: f64,
}

impl Ramp {
    pub fn new() -> Self {
        let ports = Ports::builder()
            .state("level", "rate")
            .build()
            .expect("unique names");
        Self { ports, level: 0.0 }
    }
}

impl Component for Ramp {
    fn name(&self) -> &str {
        "ramp"
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn output(&self, name: &str) -> Option<f64> {
        match name {
            "level" => Some(self.level),
            "rate" => Some(1.0),
            _ => None,
        }
    }

    fn state_contributor(&mut self) -> Option<&mut dyn StateContributor> {
        Some(self)
    }
}

impl StateContributor for Ramp {
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
        buffer[offset] = 1.0;
    }
}

/// What a [`Recorder`] saw for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub time: f64,
    pub payload: i32,
    pub priority: i32,
}

type StartHook = Box<dyn FnMut(&mut dyn Context) -> Result<(), ComponentError>>;
type EventHook = Box<dyn FnMut(&EventInfo, &mut dyn Context) -> Result<(), ComponentError>>;

/// Records every event it handles and optionally runs a hook.
pub struct Recorder {
    name: String,
    hits: Shared<Hit>,
    on_start: Option<StartHook>,
    on_event: Option<EventHook>,
    ends: Rc<RefCell<usize>>,
}

impl Recorder {
    pub fn new(name: &str, hits: &Shared<Hit>) -> Self {
        Self {
            name: name.to_owned(),
            hits: Rc::clone(hits),
            on_start: None,
            on_event: None,
            ends: Rc::new(RefCell::new(0)),
        }
    }

    pub fn on_start(
        mut self,
        hook: impl FnMut(&mut dyn Context) -> Result<(), ComponentError> + 'static,
    ) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    pub fn on_event(
        mut self,
        hook: impl FnMut(&EventInfo, &mut dyn Context) -> Result<(), ComponentError> + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(hook));
        self
    }

    /// Counts calls to `end_run` into `ends`.
    pub fn count_ends(mut self, ends: &Rc<RefCell<usize>>) -> Self {
        self.ends = Rc::clone(ends);
        self
    }
}

impl Component for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_run(&mut self, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        match self.on_start.as_mut() {
            Some(hook) => hook(ctx),
            None => Ok(()),
        }
    }

    fn end_run(&mut self, _ctx: &mut dyn Context) -> Result<(), ComponentError> {
        *self.ends.borrow_mut() += 1;
        Ok(())
    }

    fn handle_event(&mut self, event: &EventInfo, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        self.hits.borrow_mut().push(Hit {
            time: ctx.now(),
            payload: event.payload(),
            priority: event.priority(),
        });
        match self.on_event.as_mut() {
            Some(hook) => hook(event, ctx),
            None => Ok(()),
        }
    }
}
