//! Blocking poll helpers for tests.
//!
//! [`wait_until`] evaluates a [`WaitCriterion`] on the calling thread,
//! sleeping between polls, until it holds or the timeout elapses.

mod config;
mod criterion;
mod error;

use std::thread;
use std::time::{Duration, Instant};

pub use config::{WaitConfig, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, MAX_WAIT_TIME_VAR, POLL_INTERVAL_VAR};
pub use criterion::{Criterion, WaitCriterion};
pub use error::{ConfigError, Result, WaitError};

/// Poll `criterion` every `poll_interval` until it holds or `timeout` elapses.
///
/// The criterion is checked before the first sleep, so a condition that is
/// already true returns without waiting. The last sleep is shortened to end
/// at the deadline, and the criterion gets one final check there before the
/// timeout is reported.
pub fn wait_until<C>(criterion: &C, timeout: Duration, poll_interval: Duration) -> Result<()>
where
    C: WaitCriterion + ?Sized,
{
    let start = Instant::now();
    let mut polls = 0u64;

    loop {
        polls += 1;
        if criterion.done() {
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            let description = criterion.description();
            log::warn!("{} (gave up after {} polls in {}ms)", description, polls, elapsed.as_millis());
            return Err(WaitError::Timeout {
                description,
                elapsed,
            });
        }

        let remaining = timeout - elapsed;
        thread::sleep(poll_interval.min(remaining));
    }
}

/// [`wait_until`] with the timing taken from `config`
pub fn wait_with<C>(criterion: &C, config: &WaitConfig) -> Result<()>
where
    C: WaitCriterion + ?Sized,
{
    wait_until(criterion, config.timeout, config.poll_interval)
}
