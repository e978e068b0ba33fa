use skein_core::{
    Component, ComponentError, ComponentId, Context, EventInfo, UpdateSchedule, priority,
};
use skein_kernel::Simulation;
use thiserror::Error;

use crate::{Column, SampleLog};

/// Errors raised when configuring a [`Sampler`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SamplerError {
    #[error("sampling interval must be a positive finite number, got {0}")]
    InvalidInterval(f64),
}

/// A component that snapshots tracked outputs at a fixed interval.
///
/// The sampler is update-scheduled at [`priority::COLLECT_OUTPUT`], so at a
/// shared time it reads values after update-scheduled models have run.
pub struct Sampler {
    name: String,
    schedule: UpdateSchedule,
    log: SampleLog,
}

impl Sampler {
    /// Creates a sampler that records every `interval` time units.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerError::InvalidInterval`] unless `interval` is a
    /// positive finite number.
    pub fn every(interval: f64) -> Result<Self, SamplerError> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(SamplerError::InvalidInterval(interval));
        }
        Ok(Self {
            name: "sampler".to_owned(),
            schedule: UpdateSchedule::every(interval).with_priority(priority::COLLECT_OUTPUT),
            log: SampleLog::default(),
        })
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
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

impl Component for Sampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_run(&mut self, _ctx: &mut dyn Context) -> Result<(), ComponentError> {
        self.log.clear();
        Ok(())
    }

    fn handle_event(&mut self, _event: &EventInfo, ctx: &mut dyn Context) -> Result<(), ComponentError> {
        let time = ctx.now();
        self.log.record(time, &*ctx);
        Ok(())
    }

    fn update_schedule(&self) -> Option<UpdateSchedule> {
        Some(self.schedule)
    }
}
