//! State integrators for the Skein simulation kernel.
//!
//! An [`Integrator`] advances the continuous state of every registered
//! [`StateContributor`](skein_core::StateContributor) by one internal step,
//! never past a caller-supplied end time, and can undo its last step so the
//! kernel can bisect toward a state event.
//!
//! # Algorithms
//!
//! - [`euler::Euler`]: fixed-step explicit Euler
//! - [`rkck::Rkck`]: adaptive embedded Runge-Kutta 5(4) with Cash-Karp
//!   coefficients

pub mod euler;
mod integrator;
pub mod rkck;

pub use integrator::{Integrator, IntegratorError, Roster, StateSystem};

#[cfg(test)]
mod fixtures;
