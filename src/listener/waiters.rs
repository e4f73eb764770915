use std::time::Duration;

use crate::listener::{CqKey, CqTestListener, ExpectedEvents};
use crate::wait::{self, wait_until, Criterion};

impl<K: CqKey> CqTestListener<K> {
    fn wait_within<P, D>(&self, timeout: Duration, done: P, description: D) -> wait::Result<()>
    where
        P: Fn() -> bool,
        D: Fn() -> String,
    {
        wait_until(&Criterion::new(done, description), timeout, self.wait_config.poll_interval)
    }

    pub fn wait_for_created(&self, key: &K) -> wait::Result<()> {
        self.wait_for_created_within(key, self.wait_config.timeout)
    }

    pub fn wait_for_created_within(&self, key: &K, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_created(key),
            || format!("never got create event for CQ {} key {:?}", self.identity(), key),
        )
    }

    pub fn wait_for_destroyed(&self, key: &K) -> wait::Result<()> {
        self.wait_for_destroyed_within(key, self.wait_config.timeout)
    }

    pub fn wait_for_destroyed_within(&self, key: &K, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_destroyed(key),
            || format!("never got destroy event for key {:?} in CQ {}", key, self.identity()),
        )
    }

    pub fn wait_for_invalidated(&self, key: &K) -> wait::Result<()> {
        self.wait_for_invalidated_within(key, self.wait_config.timeout)
    }

    pub fn wait_for_invalidated_within(&self, key: &K, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_invalidated(key),
            || format!("never got invalidate event for CQ {} key {:?}", self.identity(), key),
        )
    }

    pub fn wait_for_updated(&self, key: &K) -> wait::Result<()> {
        self.wait_for_updated_within(key, self.wait_config.timeout)
    }

    pub fn wait_for_updated_within(&self, key: &K, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_updated(key),
            || format!("never got update event for CQ {} key {:?}", self.identity(), key),
        )
    }

    /// Wait until exactly `total` events have been counted
    pub fn wait_for_total_events(&self, total: u64) -> wait::Result<()> {
        self.wait_for_total_events_within(total, self.wait_config.timeout)
    }

    pub fn wait_for_total_events_within(&self, total: u64, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.total_event_count() == total,
            || {
                format!(
                    "Did not receive expected number of events {} expected: {} received: {}",
                    self.identity(),
                    total,
                    self.total_event_count()
                )
            },
        )
    }

    pub fn wait_for_close(&self) -> wait::Result<()> {
        self.wait_for_close_within(self.wait_config.timeout)
    }

    pub fn wait_for_close_within(&self, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_closed(),
            || format!("never got close event for CQ {}", self.identity()),
        )
    }

    pub fn wait_for_region_clear(&self) -> wait::Result<()> {
        self.wait_for_region_clear_within(self.wait_config.timeout)
    }

    pub fn wait_for_region_clear_within(&self, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_region_cleared(),
            || format!("never got region clear event for CQ {}", self.identity()),
        )
    }

    pub fn wait_for_region_invalidate(&self) -> wait::Result<()> {
        self.wait_for_region_invalidate_within(self.wait_config.timeout)
    }

    pub fn wait_for_region_invalidate_within(&self, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.is_region_invalidated(),
            || format!("never got region invalidate event for CQ {}", self.identity()),
        )
    }

    /// Wait until an error event with exactly this message has been received
    pub fn wait_for_error(&self, expected_message: &str) -> wait::Result<()> {
        self.wait_for_error_within(expected_message, self.wait_config.timeout)
    }

    pub fn wait_for_error_within(&self, expected_message: &str, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.has_error(expected_message),
            || {
                format!(
                    "never got create error for CQ {} messaged {:?} (errors received: {:?})",
                    self.identity(),
                    expected_message,
                    self.errors()
                )
            },
        )
    }

    pub fn wait_for_cqs_connected(&self, total: u64) -> wait::Result<()> {
        self.wait_for_cqs_connected_within(total, self.wait_config.timeout)
    }

    pub fn wait_for_cqs_connected_within(&self, total: u64, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.cqs_connected_count() == total,
            || {
                format!(
                    "Did not receive expected number of calls to cqs connected {} expected: {} received: {}",
                    self.identity(),
                    total,
                    self.cqs_connected_count()
                )
            },
        )
    }

    pub fn wait_for_cqs_disconnected(&self, total: u64) -> wait::Result<()> {
        self.wait_for_cqs_disconnected_within(total, self.wait_config.timeout)
    }

    pub fn wait_for_cqs_disconnected_within(&self, total: u64, timeout: Duration) -> wait::Result<()> {
        self.wait_within(
            timeout,
            || self.cqs_disconnected_count() == total,
            || {
                format!(
                    "Did not receive expected number of calls to cqs disconnected {} expected: {} received: {}",
                    self.identity(),
                    total,
                    self.cqs_disconnected_count()
                )
            },
        )
    }

    /// Wait for every non-zero target in `expected` to match its counter.
    ///
    /// Always returns normally, whether or not the targets were met before
    /// the timeout. Callers assert on the counters afterwards.
    pub fn wait_for_events(&self, expected: ExpectedEvents) {
        self.wait_for_events_within(expected, self.wait_config.timeout)
    }

    pub fn wait_for_events_within(&self, expected: ExpectedEvents, timeout: Duration) {
        let outcome = self.wait_within(
            timeout,
            || expected.is_met_by(&self.stats()),
            || {
                format!(
                    "events for CQ {} did not settle: {}",
                    self.identity(),
                    expected.mismatches(&self.stats()).join(", ")
                )
            },
        );

        if let Err(e) = outcome {
            log::debug!("wait_for_events returning after timeout: {}", e);
        }
    }
}
