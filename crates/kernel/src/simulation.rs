mod bisection;
mod run;

use skein_core::{
    Component, ComponentError, ComponentId, Context, EventId, Observer, Ports, Probe,
    StateEventList, StateEvent, TimeEvent, TimeEventQueue,
};
use skein_solvers::{Integrator, euler::Euler};
use tracing::{debug, info, trace, warn};

use crate::{
    Action, Config, Notice, NoticeKind, Phase, SimError, Status, dispatch::Dispatch,
    table::ComponentTable,
};

/// A boxed observer of simulation notices.
pub type BoxedObserver = Box<dyn for<'a> Observer<Notice<'a>, Action>>;

/// Coordinates components, events, and an integrator through a run.
///
/// See the [crate docs](crate) for an overview of a step.
pub struct Simulation {
    config: Config,
    status: Status,
    now: f64,
    stop_requested: bool,
    time_events: TimeEventQueue,
    state_events: StateEventList,
    integrator: Box<dyn Integrator>,
    components: ComponentTable,
    observers: Vec<BoxedObserver>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Config::default(), Euler::new())
    }
}

impl Simulation {
    /// Creates an idle simulation.
    pub fn new(config: Config, integrator: impl Integrator + 'static) -> Self {
        Self {
            config,
            status: Status::Idle,
            now: config.start_time(),
            stop_requested: false,
            time_events: TimeEventQueue::new(),
            state_events: StateEventList::new(),
            integrator: Box::new(integrator),
            components: ComponentTable::default(),
            observers: Vec::new(),
        }
    }

    // --- Clock and configuration ---

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.config.start_time()
    }

    #[must_use]
    pub fn stop_time(&self) -> f64 {
        self.config.stop_time()
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.config.accuracy()
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless the simulation is idle.
    pub fn set_config(&mut self, config: Config) -> Result<(), SimError> {
        self.require("change the configuration", &[Status::Idle])?;
        self.config = config;
        self.now = config.start_time();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error unless the simulation is idle and the new window is
    /// valid.
    pub fn set_start_time(&mut self, start_time: f64) -> Result<(), SimError> {
        let config = self.config.with_start_time(start_time)?;
        self.set_config(config)
    }

    /// # Errors
    ///
    /// Returns an error unless the simulation is idle and the new window is
    /// valid.
    pub fn set_stop_time(&mut self, stop_time: f64) -> Result<(), SimError> {
        let config = self.config.with_stop_time(stop_time)?;
        self.set_config(config)
    }

    /// # Errors
    ///
    /// Returns an error unless the simulation is idle and `accuracy` is a
    /// positive finite number.
    pub fn set_accuracy(&mut self, accuracy: f64) -> Result<(), SimError> {
        let config = self.config.with_accuracy(accuracy)?;
        self.set_config(config)
    }

    fn require(&self, operation: &'static str, allowed: &[Status]) -> Result<(), SimError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(SimError::InvalidStatus {
                operation,
                status: self.status,
            })
        }
    }

    fn set_status(&mut self, status: Status) {
        if self.status == status {
            return;
        }
        debug!(from = %self.status, to = %status, time = self.now, "status changed");
        self.status = status;
        self.notify(NoticeKind::StatusChanged(status));
    }

    /// Puts the simulation into the error state.
    ///
    /// The kernel never enters this state on its own; hosts use it to flag
    /// a simulation that must not be run again until
    /// [`clear_error`](Self::clear_error) is called.
    pub fn mark_error(&mut self) {
        self.set_status(Status::Error);
    }

    /// Returns an errored simulation to idle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless the status is `Error`.
    pub fn clear_error(&mut self) -> Result<(), SimError> {
        self.require("clear the error state", &[Status::Error])?;
        self.set_status(Status::Idle);
        Ok(())
    }

    /// Asks the run to stop at the next loop boundary.
    pub fn request_stop(&mut self) {
        debug!(time = self.now, "stop requested");
        self.stop_requested = true;
    }

    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    // --- Observers ---

    /// Attaches an observer that receives every notice from now on.
    pub fn add_observer<O>(&mut self, observer: O)
    where
        O: for<'a> Observer<Notice<'a>, Action> + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, kind: NoticeKind<'_>) {
        if self.observers.is_empty() {
            return;
        }
        let notice = Notice::new(self.now, self.status, kind, &self.components);
        for observer in &mut self.observers {
            if let Some(Action::StopEarly) = observer.observe(&notice) {
                self.stop_requested = true;
            }
        }
    }

    pub(crate) fn log_from(&mut self, source: ComponentId, message: &str) {
        if self.observers.is_empty() {
            info!(%source, time = self.now, "{message}");
        } else {
            self.notify(NoticeKind::Log { source, message });
        }
    }

    /// Returns read access to component outputs.
    #[must_use]
    pub fn probe(&self) -> &dyn Probe {
        &self.components
    }

    // --- Integrator ---

    #[must_use]
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    pub fn integrator_mut(&mut self) -> &mut dyn Integrator {
        self.integrator.as_mut()
    }

    /// Replaces the integrator and returns the previous one.
    ///
    /// Every member of the current integrator is registered with the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is unavailable or the new integrator
    /// rejects it. The current integrator stays in place.
    pub fn set_integrator(&mut self, mut integrator: Box<dyn Integrator>) -> Result<Box<dyn Integrator>, SimError> {
        for id in self.integrator.members().to_vec() {
            let component = self.components.available(id)?;
            integrator.add(id, component)?;
        }
        debug!(from = self.integrator.name(), to = integrator.name(), "integrator replaced");

        let mut previous = std::mem::replace(&mut self.integrator, integrator);
        if self.status.is_live() {
            previous.end_run();
            self.integrator.start_run();
        }
        Ok(previous)
    }

    // --- Components ---

    /// Registers a component and returns its id.
    ///
    /// # Errors
    ///
    /// See [`add_boxed`](Self::add_boxed).
    pub fn add<C: Component + 'static>(&mut self, component: C) -> Result<ComponentId, SimError> {
        self.add_boxed(Box::new(component))
    }

    /// Registers a boxed component and returns its id.
    ///
    /// State contributors join the integrator. While a run is live the
    /// component is started immediately, and while running its update
    /// schedule takes effect from the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is shutting down, the integrator rejects
    /// the component, or its `start_run` fails. A failed registration leaves
    /// no trace of the component.
    pub fn add_boxed(&mut self, mut component: Box<dyn Component>) -> Result<ComponentId, SimError> {
        self.require(
            "register a component",
            &[Status::Idle, Status::Starting, Status::Running, Status::Error],
        )?;

        let id = ComponentId::next();
        if component.state_contributor().is_some() {
            self.integrator.add(id, component.as_mut())?;
        }
        debug!(%id, name = component.name(), "component registered");
        self.components.insert(id, component);

        if self.status.is_live() {
            let mut started = self.call(id, Phase::StartRun, |c, ctx| c.start_run(ctx));
            if started.is_ok() && self.status == Status::Running {
                started = self.schedule_updates(id, self.now);
            }
            if let Err(err) = started {
                self.purge(id);
                match self.components.take(id) {
                    // Already gone if it removed itself while starting.
                    Ok(_) | Err(SimError::UnknownComponent(_)) => {}
                    Err(other) => warn!(%id, error = %other, "failed to discard a component that did not start"),
                }
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Deregisters a component and returns it.
    ///
    /// All pending events whose source or target is the component are
    /// discarded. While a run is live the component's `end_run` is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is unknown or busy, or its `end_run`
    /// fails. In the last case the component is dropped.
    pub fn remove(&mut self, id: ComponentId) -> Result<Box<dyn Component>, SimError> {
        self.components.available(id)?;
        self.detach(id)?.ok_or(SimError::ComponentBusy(id))
    }

    /// Moves a component to another simulation and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns an error if removal from this simulation or registration with
    /// `other` fails.
    pub fn transfer(&mut self, id: ComponentId, other: &mut Simulation) -> Result<ComponentId, SimError> {
        let component = self.remove(id)?;
        other.add_boxed(component)
    }

    /// Deregisters every component.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while removing components; the rest
    /// are still removed.
    pub fn clear(&mut self) -> Result<(), SimError> {
        let mut first = None;
        for id in self.components.ids() {
            if let Err(err) = self.detach(id) {
                first.get_or_insert(err);
            }
        }
        self.integrator.clear();
        first.map_or(Ok(()), Err)
    }

    /// Removes a component, deferring the drop if it is mid-callback.
    pub(crate) fn detach(&mut self, id: ComponentId) -> Result<Option<Box<dyn Component>>, SimError> {
        let taken = self.components.take(id)?;
        self.purge(id);
        debug!(%id, "component deregistered");

        match taken {
            Some(mut component) => {
                self.finish_removal(id, component.as_mut())?;
                Ok(Some(component))
            }
            None => Ok(None),
        }
    }

    /// Discards a component's pending events and integrator membership.
    fn purge(&mut self, id: ComponentId) {
        let time_events = self.time_events.remove_all_for(id);
        let state_events = self.state_events.remove_all_for(id);
        self.integrator.remove(id);
        trace!(%id, time_events, state_events, "purged events");
    }

    fn finish_removal(&mut self, id: ComponentId, component: &mut dyn Component) -> Result<(), SimError> {
        if !self.status.is_live() {
            return Ok(());
        }
        component
            .end_run(&mut Dispatch::new(self, id))
            .map_err(|source| SimError::Component {
                id,
                name: component.name().to_owned(),
                phase: Phase::EndRun,
                source,
            })
    }

    /// Runs a callback on a checked-out component.
    fn call<F>(&mut self, id: ComponentId, phase: Phase, f: F) -> Result<(), SimError>
    where
        F: FnOnce(&mut dyn Component, &mut dyn Context) -> Result<(), ComponentError>,
    {
        let mut component = self.components.checkout(id)?;
        let result = f(component.as_mut(), &mut Dispatch::new(self, id)).map_err(|source| {
            SimError::Component {
                id,
                name: component.name().to_owned(),
                phase,
                source,
            }
        });

        match self.components.checkin(id, component) {
            Some(mut removed) => {
                let ended = self.finish_removal(id, removed.as_mut());
                result.and(ended)
            }
            None => result,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the registered ids in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<ComponentId> {
        self.components.ids()
    }

    /// Returns the first component registered under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ComponentId> {
        self.components.find(name)
    }

    #[must_use]
    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.components.name(id)
    }

    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.components.get(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        self.components.get_mut(id)
    }

    #[must_use]
    pub fn ports(&self, id: ComponentId) -> Option<&Ports> {
        self.components.ports(id)
    }

    /// Reads a declared output, state, or rate of a component.
    ///
    /// # Errors
    ///
    /// Returns an error if the component is unknown or busy, or does not
    /// declare a readable port with that name.
    pub fn output(&self, id: ComponentId, name: &str) -> Result<f64, SimError> {
        if !self.components.contains(id) {
            return Err(SimError::UnknownComponent(id));
        }
        let component = self.components.get(id).ok_or(SimError::ComponentBusy(id))?;
        let unknown = || SimError::UnknownPort {
            id,
            name: name.to_owned(),
        };
        if !component.ports().is_readable(name) {
            return Err(unknown());
        }
        component.output(name).ok_or_else(unknown)
    }

    /// Sets a declared input of a component.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPort`] if the component does not declare
    /// the input, or [`SimError::Component`] if it rejects the value.
    pub fn set_input(&mut self, id: ComponentId, name: &str, value: f64) -> Result<(), SimError> {
        let component = self.components.available(id)?;
        if !component.ports().has_input(name) {
            return Err(SimError::UnknownPort {
                id,
                name: name.to_owned(),
            });
        }
        component
            .set_input(name, value)
            .map_err(|source| SimError::Component {
                id,
                name: component.name().to_owned(),
                phase: Phase::SetInput,
                source,
            })
    }

    // --- Events ---

    /// Adds a time event to the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is shutting down, the event targets an
    /// unknown component, or the run is live and the event lies in the past.
    pub fn register_time_event(&mut self, event: TimeEvent) -> Result<EventId, SimError> {
        self.check_event_target(event.info().target())?;
        if self.status == Status::Running && event.time() < self.now {
            return Err(SimError::RetroactiveEvent {
                time: event.time(),
                now: self.now,
            });
        }

        let id = event.id();
        trace!(event = %id, time = event.time(), priority = event.info().priority(), "time event queued");
        self.time_events.add(event);
        Ok(id)
    }

    /// Adds a state event to the pending list.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is shutting down or the event targets an
    /// unknown component.
    pub fn register_state_event(&mut self, event: StateEvent) -> Result<EventId, SimError> {
        self.check_event_target(event.info().target())?;

        let id = event.id();
        trace!(event = %id, priority = event.info().priority(), "state event queued");
        self.state_events.add(event);
        Ok(id)
    }

    fn check_event_target(&self, target: Option<ComponentId>) -> Result<(), SimError> {
        if self.status == Status::Stopping {
            return Err(SimError::InvalidStatus {
                operation: "register an event",
                status: self.status,
            });
        }
        match target {
            Some(target) if !self.components.contains(target) => Err(SimError::UnknownComponent(target)),
            _ => Ok(()),
        }
    }

    /// Removes a pending time or state event, returning false if none matched.
    pub fn unregister_event(&mut self, id: EventId) -> bool {
        self.time_events.remove_by_identity(id).is_some()
            || self.state_events.remove_by_identity(id).is_some()
    }

    #[must_use]
    pub fn time_events(&self) -> &TimeEventQueue {
        &self.time_events
    }

    #[must_use]
    pub fn state_events(&self) -> &StateEventList {
        &self.state_events
    }
}
