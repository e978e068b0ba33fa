use thiserror::Error;

/// Run window and numerical limits for a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    start_time: f64,
    stop_time: f64,
    accuracy: f64,
    max_bisections: usize,
    max_state_event_cascade: usize,
}

/// Errors that can occur when validating a simulation config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("start and stop times must be finite")]
    NonFiniteTime,

    #[error("stop time {stop} is before start time {start}")]
    StopBeforeStart { start: f64, stop: f64 },

    #[error("accuracy must be finite and positive, got {0}")]
    Accuracy(f64),

    #[error("max_bisections must be positive")]
    MaxBisections,

    #[error("max_state_event_cascade must be positive")]
    MaxStateEventCascade,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: 5.0,
            accuracy: 0.01,
            max_bisections: 64,
            max_state_event_cascade: 10_000,
        }
    }
}

impl Config {
    /// Creates a config with the given run window and state-event accuracy.
    ///
    /// The iteration caps take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is not finite, the stop time precedes the
    /// start time, or the accuracy is not a positive finite number.
    pub fn new(start_time: f64, stop_time: f64, accuracy: f64) -> Result<Self, ConfigError> {
        Self {
            start_time,
            stop_time,
            accuracy,
            ..Self::default()
        }
        .validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !self.start_time.is_finite() || !self.stop_time.is_finite() {
            return Err(ConfigError::NonFiniteTime);
        }
        if self.stop_time < self.start_time {
            return Err(ConfigError::StopBeforeStart {
                start: self.start_time,
                stop: self.stop_time,
            });
        }
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(ConfigError::Accuracy(self.accuracy));
        }
        if self.max_bisections == 0 {
            return Err(ConfigError::MaxBisections);
        }
        if self.max_state_event_cascade == 0 {
            return Err(ConfigError::MaxStateEventCascade);
        }
        Ok(self)
    }

    /// Returns a copy with a new start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting config is invalid.
    pub fn with_start_time(self, start_time: f64) -> Result<Self, ConfigError> {
        Self { start_time, ..self }.validated()
    }

    /// Returns a copy with a new stop time.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting config is invalid.
    pub fn with_stop_time(self, stop_time: f64) -> Result<Self, ConfigError> {
        Self { stop_time, ..self }.validated()
    }

    /// Returns a copy with a new state-event accuracy.
    ///
    /// # Errors
    ///
    /// Returns an error if `accuracy` is not a positive finite number.
    pub fn with_accuracy(self, accuracy: f64) -> Result<Self, ConfigError> {
        Self { accuracy, ..self }.validated()
    }

    /// Returns a copy with a new bisection iteration cap.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_bisections` is zero.
    pub fn with_max_bisections(self, max_bisections: usize) -> Result<Self, ConfigError> {
        Self {
            max_bisections,
            ..self
        }
        .validated()
    }

    /// Returns a copy with a new cap on state events handled in one drain.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_state_event_cascade` is zero.
    pub fn with_max_state_event_cascade(self, max_state_event_cascade: usize) -> Result<Self, ConfigError> {
        Self {
            max_state_event_cascade,
            ..self
        }
        .validated()
    }

    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    #[must_use]
    pub fn stop_time(&self) -> f64 {
        self.stop_time
    }

    /// Returns the maximum width of the bracket left around a state event.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    #[must_use]
    pub fn max_bisections(&self) -> usize {
        self.max_bisections
    }

    #[must_use]
    pub fn max_state_event_cascade(&self) -> usize {
        self.max_state_event_cascade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert_eq!(config.validated(), Ok(config));
        assert_eq!(config.stop_time(), 5.0);
        assert_eq!(config.accuracy(), 0.01);
    }

    #[test]
    fn rejects_inverted_window() {
        assert_eq!(
            Config::new(2.0, 1.0, 0.01),
            Err(ConfigError::StopBeforeStart {
                start: 2.0,
                stop: 1.0
            })
        );
        assert!(Config::new(1.0, 1.0, 0.01).is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(Config::new(f64::NAN, 1.0, 0.01), Err(ConfigError::NonFiniteTime));
        assert_eq!(Config::new(0.0, 1.0, 0.0), Err(ConfigError::Accuracy(0.0)));
        assert_eq!(
            Config::default().with_max_bisections(0),
            Err(ConfigError::MaxBisections)
        );
        assert_eq!(
            Config::default().with_max_state_event_cascade(0),
            Err(ConfigError::MaxStateEventCascade)
        );
    }

    #[test]
    fn builders_return_validated_copies() {
        let config = Config::default()
            .with_stop_time(15.0)
            .and_then(|c| c.with_accuracy(1e-3))
            .expect("valid config");
        assert_eq!(config.stop_time(), 15.0);
        assert_eq!(config.accuracy(), 1e-3);

        assert!(config.with_start_time(20.0).is_err());
    }
}
