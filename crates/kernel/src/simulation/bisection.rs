use tracing::{debug, warn};

use crate::{SimError, Simulation};

impl Simulation {
    /// Narrows the time at which a state event occurred.
    ///
    /// On entry the integrator has just stepped from `origin` to `self.now`
    /// and some state-event condition holds. Every trial restarts from
    /// `origin`, because the integrator can only undo a single step. On
    /// return the clock lies within the configured accuracy after the
    /// crossing and every component holds the state the integrator produced
    /// for that time.
    pub(super) fn localize(&mut self, origin: f64) -> Result<(), SimError> {
        let accuracy = self.config.accuracy();
        let max_bisections = self.config.max_bisections();
        let mut lb = origin;
        let mut ub = self.now;
        let mut bisections = 0;

        loop {
            self.restart_from(origin)?;

            if ub - lb < accuracy {
                self.advance_to(ub)?;
                break;
            }
            if bisections == max_bisections {
                warn!(lb, ub, bisections, "bisection cap reached; stepping to the upper bound");
                self.advance_to(ub)?;
                break;
            }
            bisections += 1;

            self.advance_to(0.5 * (lb + ub))?;
            let reached = self.now;
            let triggered = self.state_events.has_any(&self.components, reached);

            if triggered {
                ub = reached;
                if ub - lb <= accuracy {
                    break;
                }
            } else if reached > lb {
                lb = reached;
            } else {
                debug!(lb, ub, reached, "integrator made no progress; stepping to the upper bound");
                self.restart_from(origin)?;
                self.advance_to(ub)?;
                break;
            }
        }

        debug!(lb, ub, time = self.now, bisections, "state event localized");
        Ok(())
    }

    fn restart_from(&mut self, origin: f64) -> Result<(), SimError> {
        self.now = origin;
        self.integrator.step_back(&mut self.components)?;
        Ok(())
    }

    fn advance_to(&mut self, end_time: f64) -> Result<(), SimError> {
        self.integrator
            .step(&mut self.components, &mut self.now, end_time)?;
        Ok(())
    }
}
