mod stats;
mod test_listener;
mod waiters;

pub use stats::{ExpectedEvents, ListenerStats};
pub use test_listener::{CqKey, CqTestListener};
