mod listener;

use std::time::Duration;

use crate::{CqTestListener, WaitConfig};

// Short timings so failing waits do not slow the suite down
pub(crate) fn fast_config() -> WaitConfig {
    WaitConfig::new(Duration::from_millis(300), Duration::from_millis(10))
}

pub(crate) fn test_listener(cq_name: &str) -> CqTestListener<String> {
    CqTestListener::with_wait_config(cq_name, fast_config())
}

pub(crate) fn key(name: &str) -> String {
    name.to_string()
}
