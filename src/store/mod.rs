//! State-interval store interface
//!
//! The render engine is a pure query/transform/cache layer over an external
//! interval-history store that it does not own. This module defines that
//! boundary:
//!
//! - **`StateStore`**: the read-only query surface the engine consumes
//! - **`StateInterval` / `StateValue`**: the raw data handed back by a store
//! - **`StoreId`**: stable per-instance identity, usable as a cache key
//! - **`StoreError`**: the failure conditions every store call may report
//!
//! Stores are expected to be under concurrent construction: attributes are
//! only ever added, `current_end_time` only ever grows, and read queries from
//! many threads race against a single external writer. A disposed store
//! reports [`StoreError::Disposed`] from every call; callers treat that as
//! "no data", not as a fatal error.

mod memory;

pub use memory::MemoryStateStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque handle identifying one time-series within a store's hierarchical
/// namespace
///
/// Stable for the lifetime of a store instance; the attribute count is
/// monotonically non-decreasing during incremental construction.
pub type AttributeId = u32;

/// Stable identity of a store instance
///
/// Identity, not value: two stores holding identical data still have
/// distinct ids. Used as the tree-render cache key so that holding an id
/// never extends the store's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(Uuid);

impl StoreId {
    /// Create a fresh, globally unique store id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value carried by a state interval
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateValue {
    /// No value was set on the attribute over this interval
    Null,
    /// Integer state value
    Int(i64),
    /// String state value
    Str(String),
}

impl StateValue {
    /// Whether this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Null => write!(f, "null"),
            StateValue::Int(v) => write!(f, "{}", v),
            StateValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One raw interval of a store's state history (read-only)
///
/// Per attribute, intervals are contiguous, non-overlapping and cover
/// `[store.start_time(), store.current_end_time()]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInterval {
    /// Start timestamp (inclusive)
    pub start: i64,
    /// End timestamp (inclusive)
    pub end: i64,
    /// The attribute this interval belongs to
    pub attribute: AttributeId,
    /// State value over the whole interval
    pub value: StateValue,
}

impl StateInterval {
    /// Create a new state interval
    pub fn new(start: i64, end: i64, attribute: AttributeId, value: StateValue) -> Self {
        Self {
            start,
            end,
            attribute,
            value,
        }
    }

    /// Whether the interval covers the given timestamp
    pub fn intersects(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Failure conditions a store call may report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's lifecycle has ended; no further queries can be served
    #[error("state store has been disposed")]
    Disposed,

    /// The requested attribute does not exist in this store version
    #[error("attribute {0} does not exist in this store")]
    AttributeNotFound(AttributeId),
}

/// Read-only query surface of a backing state-interval store
///
/// Implementations must support concurrent point and full-state queries from
/// many threads while a separate writer appends new intervals; the engine
/// never assumes a quiescent store. Mapping strategies may issue further
/// read queries against the same store from within a render call on the
/// calling thread; that reentrancy is part of this contract.
pub trait StateStore: Send + Sync {
    /// Stable identity of this store instance
    fn id(&self) -> StoreId;

    /// First timestamp covered by the history
    fn start_time(&self) -> Result<i64, StoreError>;

    /// Last timestamp covered so far; monotonically non-decreasing while the
    /// store is under construction
    fn current_end_time(&self) -> Result<i64, StoreError>;

    /// Number of attributes; monotonically non-decreasing
    fn attribute_count(&self) -> Result<usize, StoreError>;

    /// Display name of an attribute
    fn attribute_name(&self, attribute: AttributeId) -> Result<String, StoreError>;

    /// Point query: the interval covering `timestamp` on `attribute`
    fn query_at(&self, attribute: AttributeId, timestamp: i64)
        -> Result<StateInterval, StoreError>;

    /// Full-state query: one covering interval per attribute at `timestamp`,
    /// in attribute order
    fn query_full_state(&self, timestamp: i64) -> Result<Vec<StateInterval>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_id_identity() {
        let a = StoreId::new();
        let b = StoreId::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn test_state_interval_intersects() {
        let iv = StateInterval::new(10, 20, 0, StateValue::Int(1));
        assert!(iv.intersects(10));
        assert!(iv.intersects(20));
        assert!(!iv.intersects(9));
        assert!(!iv.intersects(21));
    }

    #[test]
    fn test_state_value_display() {
        assert_eq!(StateValue::Null.to_string(), "null");
        assert_eq!(StateValue::Int(-3).to_string(), "-3");
        assert_eq!(StateValue::Str("RUNNING".into()).to_string(), "RUNNING");
    }
}
