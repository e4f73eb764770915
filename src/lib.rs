mod event;
mod listener;
pub mod wait;

pub use event::{CqEvent, CqStatusListener, Operation};
pub use listener::{CqKey, CqTestListener, ExpectedEvents, ListenerStats};
pub use wait::{wait_until, Criterion, WaitConfig, WaitCriterion, WaitError};

/// Create a keyed CqEvent with minimal syntax
///
/// # Arguments
///
/// * `base` - The base Operation variant
/// * `query` - (optional) The query Operation variant, defaults to `base`
/// * `key` - The entry key
///
/// # Examples
///
/// ```
/// use cq_test_listener::{cqevent, Operation};
///
/// let created = cqevent!(Create, "key-1");
/// assert_eq!(created.query_operation, Operation::Create);
///
/// // An update that brings the entry into the result set
/// let entered = cqevent!(Update, Create, "key-1");
/// assert_eq!(entered.base_operation, Operation::Update);
/// ```
#[macro_export]
macro_rules! cqevent {
    ($base:ident, $key:expr) => {
        $crate::CqEvent::keyed($crate::Operation::$base, $key)
    };

    ($base:ident, $query:ident, $key:expr) => {
        $crate::CqEvent::new($crate::Operation::$base, $crate::Operation::$query, Some($key))
    };
}

/// Create an error CqEvent with the given failure description
#[macro_export]
macro_rules! cqerror {
    ($message:expr) => {
        $crate::CqEvent::error($message)
    };
}

#[cfg(test)]
mod test;
