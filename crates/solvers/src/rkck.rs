//! Adaptive Runge-Kutta 5(4) with Cash-Karp coefficients.
//!
//! # Algorithm
//!
//! Each call to [`Integrator::step`] attempts a step of size
//! `h = min(time_step, end_time - current_time)` and estimates the local
//! error from the embedded fourth-order solution. With the error scale
//! `|y_i| + |h * dy_i| + 1e-30`, the normalized error is
//!
//! ```text
//! err_max = max_i |err_i / scale_i| / tolerance
//! ```
//!
//! A step with `err_max > 1` is rejected: `h` shrinks to
//! `max(0.9 * h * err_max^-0.25, 0.1 * h)` and the step is retried from the
//! same starting state. An accepted step advances the clock by `h` and sets
//! the nominal step for the next call to `0.9 * h * err_max^-0.2`, or to
//! `5 * h` when the error is tiny.

mod tableau;

use tracing::trace;

use crate::{Integrator, IntegratorError, Roster, StateSystem};

use tableau::{A, C5, DC};

const SAFETY: f64 = 0.9;
const PGROW: f64 = -0.2;
const PSHRINK: f64 = -0.25;
/// `(5 / SAFETY)^(1 / PGROW)`; below this the step grows by the maximum factor.
const ERRCON: f64 = 1.89e-4;
const MAX_GROWTH: f64 = 5.0;
const MAX_SHRINK: f64 = 0.1;
const TINY: f64 = 1e-30;
const MIN_STEP: f64 = 1e-15;

/// Cash-Karp embedded Runge-Kutta integrator.
#[derive(Debug, Clone, Default)]
pub struct Rkck {
    roster: Roster,
    /// State at the start of the last step.
    y: Vec<f64>,
    dydt: Vec<f64>,
    /// Stage derivatives `k2..k6`.
    k: [Vec<f64>; 5],
    ytemp: Vec<f64>,
    yerr: Vec<f64>,
}

impl Rkck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an integrator with the given initial step and tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not positive and finite.
    pub fn with_settings(time_step: f64, tolerance: f64) -> Result<Self, IntegratorError> {
        let mut rkck = Self::new();
        rkck.set_time_step(time_step)?;
        rkck.set_tolerance(tolerance)?;
        Ok(rkck)
    }

    /// Computes the fifth-order solution and error estimate for a step of `h`.
    ///
    /// Leaves the fifth-order state in `ytemp` and the error in `yerr`; the
    /// members hold the last stage state on return.
    fn attempt(&mut self, system: &mut dyn StateSystem, h: f64) -> Result<(), IntegratorError> {
        for stage in 0..5 {
            let weights = A[stage];
            for i in 0..self.y.len() {
                let mut sum = weights[0] * self.dydt[i];
                for (j, w) in weights.iter().enumerate().skip(1).take(stage) {
                    sum += w * self.k[j - 1][i];
                }
                self.ytemp[i] = self.y[i] + h * sum;
            }
            self.roster.write_state(system, &self.ytemp)?;
            self.roster.read_derivatives(system, &mut self.k[stage])?;
        }

        let [k2, k3, k4, k5, k6] = &self.k;
        for i in 0..self.y.len() {
            let stages = [self.dydt[i], k2[i], k3[i], k4[i], k5[i], k6[i]];
            let dot = |weights: &[f64; 6]| -> f64 {
                weights.iter().zip(&stages).map(|(w, k)| w * k).sum()
            };
            self.ytemp[i] = self.y[i] + h * dot(&C5);
            self.yerr[i] = h * dot(&DC);
        }
        Ok(())
    }

    fn error_ratio(&self, h: f64) -> f64 {
        let tolerance = self.roster.tolerance();
        self.y
            .iter()
            .zip(&self.dydt)
            .zip(&self.yerr)
            .map(|((y, d), e)| (e / (y.abs() + (h * d).abs() + TINY)).abs())
            .fold(0.0, |max: f64, ratio| if ratio.is_nan() || ratio > max { ratio } else { max })
            / tolerance
    }
}

impl Integrator for Rkck {
    fn name(&self) -> &str {
        "rkck"
    }

    fn roster(&self) -> &Roster {
        &self.roster
    }

    fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    fn set_state_length(&mut self, len: usize) {
        for buffer in [&mut self.y, &mut self.dydt, &mut self.ytemp, &mut self.yerr] {
            buffer.resize(len, 0.0);
        }
        for buffer in &mut self.k {
            buffer.resize(len, 0.0);
        }
    }

    fn step(
        &mut self,
        system: &mut dyn StateSystem,
        current_time: &mut f64,
        end_time: f64,
    ) -> Result<(), IntegratorError> {
        let start = *current_time;
        let remaining = end_time - start;
        if remaining <= 0.0 {
            return Ok(());
        }

        if self.sync_state_length(system)? == 0 {
            *current_time = end_time;
            return Ok(());
        }

        let nominal = self.roster.time_step();
        let mut h = nominal.min(remaining);

        self.roster.read_state(system, &mut self.y)?;
        self.roster.read_derivatives(system, &mut self.dydt)?;

        let err_max = loop {
            self.attempt(system, h)?;
            self.roster.write_state(system, &self.ytemp)?;

            let err_max = self.error_ratio(h);
            if err_max <= 1.0 {
                break err_max;
            }

            let shrunk = SAFETY * h * err_max.powf(PSHRINK);
            h = shrunk.max(MAX_SHRINK * h);
            trace!(time = start, h, err_max, "rkck step rejected");

            self.roster.write_state(system, &self.y)?;
            if h < MIN_STEP {
                return Err(IntegratorError::StepSizeUnderflow { time: start, step: h });
            }
        };

        if h < 0.0 {
            return Err(IntegratorError::NegativeStep { time: start, step: h });
        }

        // Land exactly on the end time when the full clipped step was taken.
        *current_time = if h < remaining { start + h } else { end_time };

        let next = if err_max > ERRCON {
            SAFETY * h * err_max.powf(PGROW)
        } else {
            MAX_GROWTH * h
        };
        self.roster.set_time_step(next)?;

        Ok(())
    }

    fn step_back(&mut self, system: &mut dyn StateSystem) -> Result<(), IntegratorError> {
        self.roster.write_state(system, &self.y)
    }
}
