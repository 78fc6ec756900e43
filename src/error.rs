//! Error types for the render engine

use crate::store::StoreError;
use thiserror::Error;

/// Main error type for render requests
///
/// Only [`RenderError::InvalidWindow`] is surfaced to callers; every other
/// variant is caught at the `state_render`/`tree_render` boundary and
/// converted into the empty render for that call (see
/// [`RenderError::is_degradable`]).
#[derive(Error, Debug)]
pub enum RenderError {
    /// Malformed request window: `end < start` or a non-positive resolution.
    /// A caller programming error, rejected immediately and never retried.
    #[error("invalid render window: start {start}, end {end}, resolution {resolution}")]
    InvalidWindow {
        /// Requested window start timestamp
        start: i64,
        /// Requested window end timestamp
        end: i64,
        /// Requested sampling resolution
        resolution: i64,
    },

    /// No state store is currently bound to the render provider
    #[error("no state store is bound")]
    StoreUnavailable,

    /// The backing store failed mid-query (disposed, missing attribute)
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Cooperative cancellation was observed
    #[error("render request was cancelled")]
    Cancelled,
}

impl RenderError {
    /// Whether this failure degrades to the empty render instead of being
    /// surfaced to the caller.
    ///
    /// Degradable failures are scoped to a single render call; they must
    /// never abort sibling calls running against the same store.
    pub fn is_degradable(&self) -> bool {
        !matches!(self, RenderError::InvalidWindow { .. })
    }
}

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_window_is_not_degradable() {
        let err = RenderError::InvalidWindow {
            start: 10,
            end: 0,
            resolution: 1,
        };
        assert!(!err.is_degradable());
    }

    #[test]
    fn test_store_errors_degrade() {
        assert!(RenderError::Store(StoreError::Disposed).is_degradable());
        assert!(RenderError::Store(StoreError::AttributeNotFound(7)).is_degradable());
        assert!(RenderError::StoreUnavailable.is_degradable());
        assert!(RenderError::Cancelled.is_degradable());
    }

    #[test]
    fn test_error_display() {
        let err = RenderError::InvalidWindow {
            start: 5,
            end: 2,
            resolution: 0,
        };
        let display = format!("{}", err);
        assert!(display.contains("start 5"));
        assert!(display.contains("resolution 0"));
    }
}
