use skein_core::{ComponentId, Recurrence, TimeEvent, UpdateMethod};
use tracing::{debug, info, instrument, trace};

use crate::{NoticeKind, Phase, SimError, Simulation, Status};

impl Simulation {
    /// Starts a run.
    ///
    /// Resets the clock to the start time, starts the integrator and every
    /// component in registration order, schedules the update events of
    /// time-stepped components, and emits an initial output notice.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless the simulation is idle. If a
    /// component fails to start, all pending events are discarded, the
    /// simulation returns to idle, and the failure is returned.
    #[instrument(skip(self))]
    pub fn start_run(&mut self) -> Result<(), SimError> {
        self.require("start a run", &[Status::Idle])?;
        info!(
            start = self.config.start_time(),
            stop = self.config.stop_time(),
            components = self.components.len(),
            integrator = self.integrator.name(),
            "run starting"
        );

        self.set_status(Status::Starting);
        self.now = self.config.start_time();
        self.stop_requested = false;
        self.integrator.start_run();

        for id in self.components.ids() {
            if !self.components.contains(id) {
                continue;
            }
            if let Err(err) = self.call(id, Phase::StartRun, |c, ctx| c.start_run(ctx)) {
                self.abort_start();
                return Err(err);
            }
        }

        let start = self.config.start_time();
        for id in self.components.ids() {
            if let Err(err) = self.schedule_updates(id, start) {
                self.abort_start();
                return Err(err);
            }
        }

        self.set_status(Status::Running);
        self.notify(NoticeKind::Output);
        Ok(())
    }

    /// Discards everything a failed start queued and returns to idle.
    fn abort_start(&mut self) {
        self.time_events.clear();
        self.state_events.clear();
        self.set_status(Status::Idle);
    }

    /// Ends a run.
    ///
    /// Discards all pending events and calls `end_run` on every component.
    /// The simulation is idle afterwards, even if a component failed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless a run is starting or
    /// running, or the first component failure.
    #[instrument(skip(self))]
    pub fn end_run(&mut self) -> Result<(), SimError> {
        self.require("end a run", &[Status::Starting, Status::Running])?;

        self.set_status(Status::Stopping);
        self.time_events.clear();
        self.state_events.clear();
        self.integrator.end_run();

        let mut first = None;
        for id in self.components.ids() {
            if !self.components.contains(id) {
                continue;
            }
            if let Err(err) = self.call(id, Phase::EndRun, |c, ctx| c.end_run(ctx)) {
                first.get_or_insert(err);
            }
        }

        self.set_status(Status::Idle);
        info!(time = self.now, failed = first.is_some(), "run ended");
        first.map_or(Ok(()), Err)
    }

    /// Steps until the run finishes, then ends it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless a run is starting or
    /// running. Otherwise returns the first error from stepping, or from
    /// ending the run.
    pub fn resume(&mut self) -> Result<(), SimError> {
        self.require("resume a run", &[Status::Starting, Status::Running])?;
        self.set_status(Status::Running);

        let stepped = loop {
            match self.step() {
                Ok(true) => break Ok(()),
                Ok(false) => {}
                Err(err) => break Err(err),
            }
        };
        let ended = self.end_run();
        stepped.and(ended)
    }

    /// Starts a run and steps it to completion.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while starting, stepping, or ending.
    pub fn run(&mut self) -> Result<(), SimError> {
        self.start_run()?;
        self.resume()
    }

    /// Advances the run to the next time event and dispatches it.
    ///
    /// Integrates continuous state until the head of the time-event queue
    /// (or the stop time if the queue is empty), localizing and handling any
    /// state event crossed on the way. Returns `Ok(true)` once the run has
    /// reached its stop time or a stop was requested.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStatus`] unless the run is running, or any
    /// integrator, event, or component failure.
    #[instrument(level = "trace", skip(self), fields(time = self.now))]
    pub fn step(&mut self) -> Result<bool, SimError> {
        self.require("step", &[Status::Running])?;
        if self.now >= self.config.stop_time() || self.stop_requested {
            return Ok(true);
        }

        let mut target = self.next_event_time();
        while self.now < target && !self.stop_requested {
            let lower = self.now;
            self.integrator
                .step(&mut self.components, &mut self.now, target)?;
            trace!(from = lower, to = self.now, "integration step");

            if self.state_events.has_any(&self.components, self.now) {
                self.localize(lower)?;
                self.notify(NoticeKind::IntegrationStep);
                self.handle_state_events()?;
                target = self.next_event_time();
            } else {
                self.notify(NoticeKind::IntegrationStep);
            }
            self.notify(NoticeKind::Output);
        }

        if let Some(event) = self.time_events.remove_first() {
            self.handle_time_event(event)?;
            self.handle_state_events()?;
            self.notify(NoticeKind::AfterTimeEvent);
        }

        Ok(self.stop_requested)
    }

    fn next_event_time(&self) -> f64 {
        self.time_events
            .peek_first()
            .map_or(self.config.stop_time(), TimeEvent::time)
    }

    fn handle_time_event(&mut self, event: TimeEvent) -> Result<(), SimError> {
        let info = event.info();
        let target = info.target().ok_or(SimError::MissingTarget(info.id()))?;
        debug!(event = %info.id(), %target, time = self.now, payload = info.payload(), "dispatching time event");

        self.notify(NoticeKind::BeforeEvent(info));
        self.call(target, Phase::HandleEvent, |c, ctx| c.handle_event(info, ctx))?;
        self.notify(NoticeKind::AfterEvent(info));

        let source_gone = info.source().is_some_and(|source| !self.components.contains(source));
        if source_gone || !self.components.contains(target) {
            return Ok(());
        }
        let schedule_step = match event.recurrence() {
            Recurrence::Scheduled => self
                .components
                .update_schedule(target)
                .filter(|schedule| schedule.method == UpdateMethod::Recurring)
                .map(|schedule| schedule.time_step),
            Recurrence::Once | Recurrence::Every(_) => None,
        };
        if let Some(next) = event.next_occurrence(schedule_step) {
            trace!(event = %next.id(), time = next.time(), "time event recurs");
            self.time_events.add(next);
        }
        Ok(())
    }

    /// Dispatches state events until none of the pending conditions hold.
    fn handle_state_events(&mut self) -> Result<(), SimError> {
        let cap = self.config.max_state_event_cascade();
        let mut handled = 0;

        while let Some(event) = self.state_events.take_next(&self.components, self.now) {
            if handled >= cap {
                return Err(SimError::StateEventCascade(handled));
            }
            handled += 1;

            let info = event.info();
            let target = info.target().ok_or(SimError::MissingTarget(info.id()))?;
            debug!(event = %info.id(), %target, time = self.now, "dispatching state event");

            self.notify(NoticeKind::BeforeEvent(info));
            self.call(target, Phase::HandleEvent, |c, ctx| c.handle_event(info, ctx))?;
            self.notify(NoticeKind::AfterEvent(info));
        }
        Ok(())
    }

    /// Queues the update event declared by a time-stepped component.
    pub(super) fn schedule_updates(&mut self, id: ComponentId, time: f64) -> Result<(), SimError> {
        let Some(schedule) = self.components.update_schedule(id) else {
            return Ok(());
        };
        let event = match schedule.method {
            UpdateMethod::None => return Ok(()),
            UpdateMethod::Once => TimeEvent::new(time)?,
            UpdateMethod::Recurring => TimeEvent::scheduled(time)?,
        };
        self.register_time_event(
            event
                .with_source(id)
                .with_target(id)
                .with_priority(schedule.priority),
        )?;
        Ok(())
    }
}
