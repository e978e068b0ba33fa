//! The Skein simulation coordinator.
//!
//! A [`Simulation`] owns a set of [`Component`]s, the clock, the two pending
//! event collections, and an [`Integrator`]. Each call to
//! [`Simulation::step`] integrates continuous state up to the next time
//! event, localizes any state event crossed on the way by bisection,
//! dispatches the events that are due, and reports progress to the attached
//! observers through [`Notice`]s.
//!
//! ```
//! use skein_core::{Component, Context, EventInfo, ComponentError, TimeEvent};
//! use skein_kernel::{Config, Simulation};
//!
//! struct Alarm {
//!     rang_at: Option<f64>,
//! }
//!
//! impl Component for Alarm {
//!     fn name(&self) -> &str {
//!         "alarm"
//!     }
//!
//!     fn start_run(&mut self, ctx: &mut dyn Context) -> Result<(), ComponentError> {
//!         let me = ctx.me();
//!         ctx.schedule(TimeEvent::new(2.5)?.with_target(me))?;
//!         Ok(())
//!     }
//!
//!     fn handle_event(&mut self, _event: &EventInfo, ctx: &mut dyn Context) -> Result<(), ComponentError> {
//!         self.rang_at = Some(ctx.now());
//!         Ok(())
//!     }
//! }
//!
//! let mut sim = Simulation::default();
//! sim.add(Alarm { rang_at: None }).expect("registered");
//! sim.run().expect("run completes");
//! assert_eq!(sim.now(), Config::default().stop_time());
//! ```
//!
//! [`Component`]: skein_core::Component
//! [`Integrator`]: skein_solvers::Integrator

mod config;
mod dispatch;
mod error;
mod notice;
mod simulation;
mod status;
mod table;

pub use config::{Config, ConfigError};
pub use error::{Phase, SimError};
pub use notice::{Action, Notice, NoticeKind};
pub use simulation::{BoxedObserver, Simulation};
pub use status::Status;
