//! Reusable observers and output collectors for Skein simulations.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for notice-agnostic observers
//!   ([`HasTime`], [`CanStopEarly`])
//!
//! # Collectors
//!
//! - [`Recorder`] is an observer that snapshots tracked outputs after every
//!   integration step.
//! - [`Sampler`] is a component that snapshots tracked outputs at its own
//!   update interval, independent of the integrator's steps.
//! - [`Tracer`] forwards notices to `tracing`.
//!
//! Both collectors write to a [`SampleLog`], a cheaply cloneable handle that
//! stays readable after the collector has been moved into a simulation.
//!
//! # Features
//!
//! - `plot`: Enables [`Chart`] for viewing a [`SampleLog`] in an egui
//!   window. This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`HasTime`]: traits::HasTime
//! [`CanStopEarly`]: traits::CanStopEarly

mod recorder;
mod sample;
mod sampler;
mod tracer;
pub mod traits;

#[cfg(feature = "plot")]
mod plot;

pub use recorder::Recorder;
pub use sample::{Column, Sample, SampleLog};
pub use sampler::{Sampler, SamplerError};
pub use tracer::Tracer;

#[cfg(feature = "plot")]
pub use plot::{Chart, ShowConfig};
