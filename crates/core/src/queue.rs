//! Pending-event collections.
//!
//! - [`TimeEventQueue`] orders time events by time ascending, then priority
//!   descending, then insertion order.
//! - [`StateEventList`] keeps state events in priority order and is polled
//!   rather than popped.

mod state;
mod time;

pub use state::StateEventList;
pub use time::TimeEventQueue;
