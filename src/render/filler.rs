//! Gap filling over sampled intervals
//!
//! The sampler's accept rule is approximate, so its output has holes: spans
//! where no single raw interval covered a whole resolution bucket. This pass
//! closes every hole with an aggregate interval, turning the accepted list
//! into an exact partition of the requested window.

use crate::render::states::DisplayInterval;

/// Close every gap in `reals` so the result exactly partitions `[t1, t2]`
///
/// `reals` must be ordered by start time with pairwise disjoint spans inside
/// the window (which is what the sampler produces). The output is strictly
/// ordered, pairwise adjacent (`prev.end + 1 == next.start`) and covers the
/// window exactly once:
///
/// - no accepted intervals at all: one aggregate spanning the whole window;
/// - a leading aggregate before the first real interval when needed;
/// - one aggregate between every non-adjacent pair;
/// - a trailing aggregate after the last real interval when needed.
pub fn fill_gaps(reals: Vec<DisplayInterval>, t1: i64, t2: i64) -> Vec<DisplayInterval> {
    debug_assert!(t2 >= t1);

    if reals.is_empty() {
        return vec![DisplayInterval::aggregate(t1, t2)];
    }

    let mut filled = Vec::with_capacity(reals.len() * 2 + 1);
    let mut prev_end: Option<i64> = None;

    for interval in reals {
        let start = interval.start();
        debug_assert!(start >= t1 && interval.end() <= t2);
        match prev_end {
            None => {
                if start > t1 {
                    filled.push(DisplayInterval::aggregate(t1, start - 1));
                }
            }
            Some(end) => {
                debug_assert!(end < start, "sampled intervals must be ordered and disjoint");
                if end + 1 != start {
                    filled.push(DisplayInterval::aggregate(end + 1, start - 1));
                }
            }
        }
        prev_end = Some(interval.end());
        filled.push(interval);
    }

    if let Some(end) = prev_end {
        if end < t2 {
            filled.push(DisplayInterval::aggregate(end + 1, t2));
        }
    }

    filled
}
