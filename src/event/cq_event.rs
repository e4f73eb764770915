use serde::{Deserialize, Serialize};

use crate::Operation;

/// A change notification delivered for a registered continuous query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqEvent<K> {
    pub base_operation: Operation,
    pub query_operation: Operation,
    pub key: Option<K>, // None for region-level events
    pub error: Option<String>, // Failure description, only set on error events
}

impl<K> CqEvent<K> {
    pub fn new(base_operation: Operation, query_operation: Operation, key: Option<K>) -> Self {
        Self {
            base_operation,
            query_operation,
            key,
            error: None,
        }
    }

    /// Create an entry event whose base and query operations agree
    pub fn keyed(operation: Operation, key: K) -> Self {
        Self::new(operation, operation, Some(key))
    }

    /// Create a region-level event with no key
    pub fn region(operation: Operation) -> Self {
        Self::new(operation, operation, None)
    }

    /// Create an error event carrying the given failure description
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            base_operation: Operation::Marker,
            query_operation: Operation::Marker,
            key: None,
            error: Some(message.into()),
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
