use skein_core::ComponentId;
use thiserror::Error;

/// Errors raised by integrators.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntegratorError {
    #[error("component {0} does not contribute state")]
    NotStateContributor(ComponentId),

    #[error("state contributor {0} is not available")]
    MissingContributor(ComponentId),

    #[error("step size underflow at t = {time} (h = {step:e})")]
    StepSizeUnderflow { time: f64, step: f64 },

    #[error("negative step at t = {time} (h = {step})")]
    NegativeStep { time: f64, step: f64 },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
}
