//! Display-side state model
//!
//! What the engine hands back to the view layer: a bounded sequence of
//! [`DisplayInterval`]s that exactly partitions the requested window, wrapped
//! in a [`StateRender`] together with the element it belongs to.

use crate::render::tree::TreeElement;
use crate::types::{ColorDefinition, LineThickness, TimeRange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A display interval backed by one raw store interval
///
/// The span is clamped to the requested window: it runs from the sample
/// point at which the raw interval was accepted to the smaller of the raw
/// end and the window end. All display properties come from the configured
/// mapping functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealInterval {
    /// Display start timestamp (inclusive)
    pub start: i64,
    /// Display end timestamp (inclusive)
    pub end: i64,
    /// State name shown for this interval
    pub state_name: String,
    /// Optional label drawn inside the interval
    pub label: Option<String>,
    /// Fill color
    pub color: ColorDefinition,
    /// Vertical weight
    pub line_thickness: LineThickness,
    /// Free-form properties (tooltips etc.)
    pub properties: HashMap<String, String>,
}

/// Synthetic filler interval
///
/// Spans a range where no single raw interval could be confirmed to cover a
/// whole resolution bucket: "multiple/unknown states occurred here, too
/// fine-grained to render individually". Carries no concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateInterval {
    /// Display start timestamp (inclusive)
    pub start: i64,
    /// Display end timestamp (inclusive)
    pub end: i64,
}

/// One interval of a state render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayInterval {
    /// Backed by a raw store interval
    Real(RealInterval),
    /// Synthetic gap filler
    Aggregate(AggregateInterval),
}

impl DisplayInterval {
    /// Convenience constructor for an aggregate interval
    pub fn aggregate(start: i64, end: i64) -> Self {
        DisplayInterval::Aggregate(AggregateInterval { start, end })
    }

    /// Display start timestamp
    pub fn start(&self) -> i64 {
        match self {
            DisplayInterval::Real(iv) => iv.start,
            DisplayInterval::Aggregate(iv) => iv.start,
        }
    }

    /// Display end timestamp
    pub fn end(&self) -> i64 {
        match self {
            DisplayInterval::Real(iv) => iv.end,
            DisplayInterval::Aggregate(iv) => iv.end,
        }
    }

    /// Whether this interval is backed by a raw store interval
    pub fn is_real(&self) -> bool {
        matches!(self, DisplayInterval::Real(_))
    }

    /// Whether this interval is a synthetic filler
    pub fn is_aggregate(&self) -> bool {
        matches!(self, DisplayInterval::Aggregate(_))
    }
}

/// The state intervals of one tree element over one time window
///
/// Either `intervals` exactly partitions `[time_range.start,
/// time_range.end]` (contiguous, non-overlapping, ordered by start time), or
/// it is empty: the designated "nothing to show" sentinel used for missing
/// attributes, unbound or disposed stores, and cancelled requests. A render
/// is never partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRender {
    /// The window this render answers
    pub time_range: TimeRange,
    /// The element the intervals belong to
    pub element: Arc<TreeElement>,
    /// Ordered display intervals (empty for the sentinel)
    pub intervals: Vec<DisplayInterval>,
}

impl StateRender {
    /// Create a render over the given intervals
    pub fn new(
        time_range: TimeRange,
        element: Arc<TreeElement>,
        intervals: Vec<DisplayInterval>,
    ) -> Self {
        Self {
            time_range,
            element,
            intervals,
        }
    }

    /// The empty sentinel for this window and element
    pub fn empty(time_range: TimeRange, element: Arc<TreeElement>) -> Self {
        Self::new(time_range, element, Vec::new())
    }

    /// Whether this is the empty sentinel
    ///
    /// Distinct from a render that covers the window with aggregate
    /// intervals, which has something to show (an "unknown states" band).
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
