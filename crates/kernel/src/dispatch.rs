use skein_core::{
    Component, ComponentId, Context, EventId, Probe, ScheduleError, StateEvent, TimeEvent,
};

use crate::{SimError, Simulation, Status};

/// The [`Context`] handed to a component during one of its callbacks.
pub(crate) struct Dispatch<'a> {
    sim: &'a mut Simulation,
    me: ComponentId,
}

impl<'a> Dispatch<'a> {
    pub(crate) fn new(sim: &'a mut Simulation, me: ComponentId) -> Self {
        Self { sim, me }
    }

    fn require_open(&self) -> Result<(), ScheduleError> {
        if self.sim.status() == Status::Stopping {
            return Err(ScheduleError::NotRunning);
        }
        Ok(())
    }
}

impl From<SimError> for ScheduleError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::RetroactiveEvent { time, now } => Self::RetroactiveEvent { time, now },
            SimError::UnknownComponent(id) => Self::UnknownComponent(id),
            SimError::ComponentBusy(id) => Self::ComponentBusy(id),
            SimError::InvalidStatus {
                status: Status::Stopping,
                ..
            } => Self::NotRunning,
            other => Self::rejected(other),
        }
    }
}

impl Probe for Dispatch<'_> {
    fn output(&self, component: ComponentId, name: &str) -> Option<f64> {
        self.sim.probe().output(component, name)
    }
}

impl Context for Dispatch<'_> {
    fn now(&self) -> f64 {
        self.sim.now()
    }

    fn start_time(&self) -> f64 {
        self.sim.start_time()
    }

    fn stop_time(&self) -> f64 {
        self.sim.stop_time()
    }

    fn me(&self) -> ComponentId {
        self.me
    }

    fn schedule(&mut self, event: TimeEvent) -> Result<EventId, ScheduleError> {
        self.require_open()?;
        Ok(self.sim.register_time_event(event)?)
    }

    fn watch(&mut self, event: StateEvent) -> Result<EventId, ScheduleError> {
        self.require_open()?;
        Ok(self.sim.register_state_event(event)?)
    }

    fn unschedule(&mut self, id: EventId) -> bool {
        self.sim.unregister_event(id)
    }

    fn add_component(&mut self, component: Box<dyn Component>) -> Result<ComponentId, ScheduleError> {
        Ok(self.sim.add_boxed(component)?)
    }

    fn remove_component(&mut self, id: ComponentId) -> Result<(), ScheduleError> {
        self.sim.detach(id)?;
        Ok(())
    }

    fn request_stop(&mut self) {
        self.sim.request_stop();
    }

    fn log(&mut self, message: &str) {
        self.sim.log_from(self.me, message);
    }
}
