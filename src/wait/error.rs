use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum WaitError {
    /// The criterion was still not met when the timeout elapsed
    #[error("{description} (timed out after {}ms)", .elapsed.as_millis())]
    Timeout {
        description: String,
        elapsed: Duration,
    },
}

impl WaitError {
    /// The criterion description the wait failed with
    pub fn message(&self) -> &str {
        match self {
            WaitError::Timeout { description, .. } => description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} is not a number of milliseconds")]
    InvalidMillis { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, WaitError>;
