//! Append-only in-memory state store
//!
//! Reference implementation of [`StateStore`] used by the unit and
//! integration tests and by the benches. It mirrors how a real history is
//! built incrementally: each attribute has a list of closed intervals plus
//! one ongoing interval that extends to the store's current end time, and
//! the current end time only ever moves forward.
//!
//! # Example
//!
//! ```rust
//! use timegraph_render::store::{MemoryStateStore, StateStore, StateValue};
//!
//! let store = MemoryStateStore::new(0);
//! let cpu = store.add_attribute("cpu0");
//! store.modify_attribute(cpu, StateValue::Int(1), 0);
//! store.modify_attribute(cpu, StateValue::Int(2), 50);
//! store.advance_time(100);
//!
//! let interval = store.query_at(cpu, 75).unwrap();
//! assert_eq!((interval.start, interval.end), (50, 100));
//! ```

use super::{AttributeId, StateInterval, StateStore, StateValue, StoreError, StoreId};
use parking_lot::RwLock;

struct AttributeHistory {
    name: String,
    /// Closed intervals, sorted and contiguous from the store start
    closed: Vec<StateInterval>,
    ongoing_start: i64,
    ongoing_value: StateValue,
}

struct Inner {
    attributes: Vec<AttributeHistory>,
    current_end: i64,
    disposed: bool,
}

/// Append-only in-memory implementation of [`StateStore`]
///
/// State changes must be recorded in non-decreasing time order. Queried
/// timestamps outside `[start_time, current_end_time]` clamp to the nearest
/// covered instant, so a reader racing the writer always gets an answer.
pub struct MemoryStateStore {
    id: StoreId,
    start: i64,
    inner: RwLock<Inner>,
}

impl MemoryStateStore {
    /// Create an empty store whose history begins at `start_time`
    pub fn new(start_time: i64) -> Self {
        Self {
            id: StoreId::new(),
            start: start_time,
            inner: RwLock::new(Inner {
                attributes: Vec::new(),
                current_end: start_time,
                disposed: false,
            }),
        }
    }

    /// Add a new attribute, initially null-valued from the store start
    ///
    /// Returns the handle to use with the query and mutation methods.
    pub fn add_attribute(&self, name: impl Into<String>) -> AttributeId {
        let mut inner = self.inner.write();
        let id = inner.attributes.len() as AttributeId;
        inner.attributes.push(AttributeHistory {
            name: name.into(),
            closed: Vec::new(),
            ongoing_start: self.start,
            ongoing_value: StateValue::Null,
        });
        id
    }

    /// Record a state change on `attribute` at time `t`
    ///
    /// The previous value is closed over `[previous_start, t - 1]` and the
    /// new value becomes the ongoing state. Changes at the ongoing interval's
    /// own start time replace its value in place. Unknown attributes are
    /// ignored (debug builds assert).
    pub fn modify_attribute(&self, attribute: AttributeId, value: StateValue, t: i64) {
        let mut inner = self.inner.write();
        inner.current_end = inner.current_end.max(t);
        let Some(hist) = inner.attributes.get_mut(attribute as usize) else {
            debug_assert!(false, "modify_attribute on unknown attribute {attribute}");
            return;
        };
        if t > hist.ongoing_start {
            let closed = StateInterval::new(
                hist.ongoing_start,
                t - 1,
                attribute,
                hist.ongoing_value.clone(),
            );
            hist.closed.push(closed);
            hist.ongoing_start = t;
        }
        hist.ongoing_value = value;
    }

    /// Move the current end time forward to `t` (no-op if already past it)
    pub fn advance_time(&self, t: i64) {
        let mut inner = self.inner.write();
        inner.current_end = inner.current_end.max(t);
    }

    /// End this store's lifecycle; every subsequent query reports
    /// [`StoreError::Disposed`]
    pub fn dispose(&self) {
        self.inner.write().disposed = true;
    }

    fn query_at_locked(
        &self,
        inner: &Inner,
        attribute: AttributeId,
        timestamp: i64,
    ) -> Result<StateInterval, StoreError> {
        let hist = inner
            .attributes
            .get(attribute as usize)
            .ok_or(StoreError::AttributeNotFound(attribute))?;
        let t = timestamp.clamp(self.start, inner.current_end);
        if t >= hist.ongoing_start {
            return Ok(StateInterval::new(
                hist.ongoing_start,
                inner.current_end,
                attribute,
                hist.ongoing_value.clone(),
            ));
        }
        // Contiguous coverage from the store start makes this lookup total.
        let idx = hist.closed.partition_point(|iv| iv.end < t);
        Ok(hist.closed[idx].clone())
    }
}

impl StateStore for MemoryStateStore {
    fn id(&self) -> StoreId {
        self.id
    }

    fn start_time(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        Ok(self.start)
    }

    fn current_end_time(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        Ok(inner.current_end)
    }

    fn attribute_count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        Ok(inner.attributes.len())
    }

    fn attribute_name(&self, attribute: AttributeId) -> Result<String, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        inner
            .attributes
            .get(attribute as usize)
            .map(|hist| hist.name.clone())
            .ok_or(StoreError::AttributeNotFound(attribute))
    }

    fn query_at(
        &self,
        attribute: AttributeId,
        timestamp: i64,
    ) -> Result<StateInterval, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        self.query_at_locked(&inner, attribute, timestamp)
    }

    fn query_full_state(&self, timestamp: i64) -> Result<Vec<StateInterval>, StoreError> {
        let inner = self.inner.read();
        if inner.disposed {
            return Err(StoreError::Disposed);
        }
        (0..inner.attributes.len() as AttributeId)
            .map(|attr| self.query_at_locked(&inner, attr, timestamp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_store() -> (MemoryStateStore, AttributeId) {
        let store = MemoryStateStore::new(0);
        let attr = store.add_attribute("proc/0/status");
        store.modify_attribute(attr, StateValue::Int(1), 0);
        store.modify_attribute(attr, StateValue::Int(2), 50);
        store.advance_time(100);
        (store, attr)
    }

    #[test]
    fn test_query_closed_interval() {
        let (store, attr) = two_state_store();
        let iv = store.query_at(attr, 25).unwrap();
        assert_eq!(iv, StateInterval::new(0, 49, attr, StateValue::Int(1)));
    }

    #[test]
    fn test_query_ongoing_interval_grows() {
        let (store, attr) = two_state_store();
        let iv = store.query_at(attr, 75).unwrap();
        assert_eq!((iv.start, iv.end), (50, 100));

        store.advance_time(200);
        let iv = store.query_at(attr, 75).unwrap();
        assert_eq!((iv.start, iv.end), (50, 200));
    }

    #[test]
    fn test_query_clamps_out_of_range() {
        let (store, attr) = two_state_store();
        let before = store.query_at(attr, -10).unwrap();
        assert_eq!(before.start, 0);
        let after = store.query_at(attr, 10_000).unwrap();
        assert_eq!(after.end, 100);
    }

    #[test]
    fn test_unmodified_attribute_is_null() {
        let store = MemoryStateStore::new(10);
        let attr = store.add_attribute("idle");
        store.advance_time(50);
        let iv = store.query_at(attr, 30).unwrap();
        assert_eq!(iv, StateInterval::new(10, 50, attr, StateValue::Null));
    }

    #[test]
    fn test_full_state_query() {
        let store = MemoryStateStore::new(0);
        let a = store.add_attribute("a");
        let b = store.add_attribute("b");
        store.modify_attribute(a, StateValue::Int(7), 0);
        store.modify_attribute(b, StateValue::Str("X".into()), 10);
        store.advance_time(20);

        let full = store.query_full_state(15).unwrap();
        assert_eq!(full.len(), 2);
        assert_eq!(full[0].attribute, a);
        assert_eq!(full[0].value, StateValue::Int(7));
        assert_eq!(full[1].attribute, b);
        assert_eq!(full[1].value, StateValue::Str("X".into()));
    }

    #[test]
    fn test_unknown_attribute() {
        let store = MemoryStateStore::new(0);
        assert_eq!(
            store.query_at(3, 0),
            Err(StoreError::AttributeNotFound(3))
        );
        assert_eq!(store.attribute_name(3), Err(StoreError::AttributeNotFound(3)));
    }

    #[test]
    fn test_disposed_store_fails_everything() {
        let (store, attr) = two_state_store();
        store.dispose();
        assert_eq!(store.start_time(), Err(StoreError::Disposed));
        assert_eq!(store.current_end_time(), Err(StoreError::Disposed));
        assert_eq!(store.attribute_count(), Err(StoreError::Disposed));
        assert_eq!(store.query_at(attr, 10), Err(StoreError::Disposed));
        assert_eq!(store.query_full_state(10), Err(StoreError::Disposed));
    }
}
