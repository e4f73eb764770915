use std::env;
use std::time::Duration;

use crate::wait::ConfigError;

/// Environment variable holding the default wait budget in milliseconds
pub const MAX_WAIT_TIME_VAR: &str = "Q_CQ_MAX_WAIT_TIME";

/// Environment variable holding the poll cadence in milliseconds
pub const POLL_INTERVAL_VAR: &str = "Q_CQ_POLL_INTERVAL";

pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(20 * 1000);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Timing parameters shared by every wait helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Total time a wait may take before it is reported as timed out
    pub timeout: Duration,

    /// Sleep between two evaluations of a criterion
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        WaitConfig {
            timeout,
            poll_interval,
        }
    }

    /// Load the configuration from the environment.
    ///
    /// Unset variables use the defaults. A value that does not parse is
    /// logged and also replaced by the default.
    pub fn from_env() -> Self {
        Self {
            timeout: millis_from_env(MAX_WAIT_TIME_VAR, DEFAULT_MAX_WAIT),
            poll_interval: millis_from_env(POLL_INTERVAL_VAR, DEFAULT_POLL_INTERVAL),
        }
    }

    /// Parse a millisecond count as found in the environment
    pub fn parse_millis(name: &str, value: &str) -> Result<Duration, ConfigError> {
        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidMillis {
                name: name.to_string(),
                value: value.to_string(),
            })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL)
    }
}

fn millis_from_env(name: &str, default: Duration) -> Duration {
    match env::var(name) {
        Ok(value) => WaitConfig::parse_millis(name, &value).unwrap_or_else(|e| {
            log::warn!("{}; using default of {}ms", e, default.as_millis());
            default
        }),
        Err(_) => default,
    }
}
