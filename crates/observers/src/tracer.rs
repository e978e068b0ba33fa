use skein_core::Observer;
use skein_kernel::{Notice, NoticeKind};
use tracing::{debug, info, trace};

/// An observer that forwards notices to `tracing`.
///
/// Status changes and component log messages are emitted at `info`, event
/// dispatches at `debug`, and step-level notices at `trace`. Hosts choose
/// what to keep through their subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer {
    quiet_steps: bool,
}

impl Tracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops integration-step and output notices.
    #[must_use]
    pub fn quiet_steps(mut self) -> Self {
        self.quiet_steps = true;
        self
    }
}

impl<'a, A> Observer<Notice<'a>, A> for Tracer {
    fn observe(&mut self, notice: &Notice<'a>) -> Option<A> {
        let time = notice.time;
        match notice.kind {
            NoticeKind::StatusChanged(status) => info!(time, %status, "simulation status"),
            NoticeKind::Log { source, message } => info!(time, %source, "{message}"),
            NoticeKind::BeforeEvent(event) => debug!(
                time,
                event = %event.id(),
                target = ?event.target(),
                payload = event.payload(),
                "handling event"
            ),
            NoticeKind::AfterEvent(event) => trace!(time, event = %event.id(), "event handled"),
            NoticeKind::AfterTimeEvent => trace!(time, "time event complete"),
            NoticeKind::IntegrationStep | NoticeKind::Output if self.quiet_steps => {}
            NoticeKind::IntegrationStep => trace!(time, "integration step"),
            NoticeKind::Output => trace!(time, "output"),
        }
        None
    }
}
