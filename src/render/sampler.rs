//! Resolution-point sampling of a state history
//!
//! Decimation: instead of fetching every raw state change inside a window,
//! walk sample points spaced one resolution apart and keep only the
//! intervals that provably cover a whole resolution bucket. Query count is
//! bounded by `O(window / resolution)` regardless of how dense the raw
//! history is; the display resolution, not the trace density, bounds the
//! work.
//!
//! The accept rule is deliberately approximate: an interval that covers
//! `[ts, ts + resolution]` did not change anywhere inside that bucket, so a
//! single solid rectangle represents it faithfully. Spans the rule rejects
//! are closed later by the gap filler with aggregate intervals.

use crate::error::{RenderError, Result};
use crate::store::{AttributeId, StateInterval, StateStore};
use crate::types::CancelToken;
use tracing::trace;

/// A raw store interval accepted at a sample point
///
/// `start`/`end` are the display span: from the sample point where the
/// interval was accepted to the raw end, clamped to the requested window.
#[derive(Debug, Clone)]
pub struct SampledInterval {
    /// The raw store interval that passed the accept test
    pub source: StateInterval,
    /// Display start (the accepting sample point)
    pub start: i64,
    /// Display end (raw end clamped to the window end)
    pub end: i64,
}

/// Sample the history of `attribute` over `[t1, t2]` at the given resolution
///
/// Returns the accepted intervals ordered by start time, with pairwise
/// disjoint display spans. The effective query range is clamped to what the
/// store covers so far: `[max(t1, start_time), min(t2, current_end_time)]`;
/// anything outside stays uncovered and falls to the gap filler.
///
/// A malformed window (`t2 < t1` or `resolution <= 0`) is
/// [`RenderError::InvalidWindow`]. Cancellation is checked once per sample
/// point and reported as [`RenderError::Cancelled`].
pub fn sample(
    store: &dyn StateStore,
    attribute: AttributeId,
    t1: i64,
    t2: i64,
    resolution: i64,
    cancel: &CancelToken,
) -> Result<Vec<SampledInterval>> {
    if t2 < t1 || resolution <= 0 {
        return Err(RenderError::InvalidWindow {
            start: t1,
            end: t2,
            resolution,
        });
    }

    let t_start = t1.max(store.start_time()?);
    let t_end = t2.min(store.current_end_time()?);

    let mut accepted: Vec<SampledInterval> = Vec::new();
    let mut queries: usize = 0;

    let mut ts = t_start;
    while ts <= t_end - resolution {
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        queries += 1;
        let interval = store.query_at(attribute, ts)?;
        if interval.start <= ts && interval.end >= ts + resolution {
            // Jump to the first sample point strictly past the accepted end,
            // so the same interval is never re-queried.
            let next = next_sample_point(t_start, interval.end, resolution);
            accepted.push(SampledInterval {
                start: ts,
                end: interval.end.min(t2),
                source: interval,
            });
            ts = next;
        } else {
            ts += resolution;
        }
    }

    // The very last bucket uses [t_end - resolution, t_end] as its range
    // condition instead, so the right edge of the window is always tested.
    let ts_final = t_start.max(t_end - resolution);
    let already_covered = accepted
        .last()
        .map_or(false, |last| last.source.end >= ts_final);
    if t_end >= t_start && !already_covered {
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        queries += 1;
        let interval = store.query_at(attribute, ts_final)?;
        if interval.start <= ts_final && interval.end >= t_end {
            accepted.push(SampledInterval {
                start: ts_final,
                end: interval.end.min(t2),
                source: interval,
            });
        }
    }

    trace!(
        attribute,
        t1,
        t2,
        resolution,
        queries,
        accepted = accepted.len(),
        "sampled state history"
    );
    Ok(accepted)
}

/// Smallest sample point (aligned to `origin`) strictly greater than `end`
///
/// When `end` falls exactly on a sample point, the result is the point after
/// it; a bucket starting at an accepted interval's own end can never be
/// covered by it alone.
fn next_sample_point(origin: i64, end: i64, resolution: i64) -> i64 {
    let offset = end - origin;
    origin + (offset / resolution + 1) * resolution
}
