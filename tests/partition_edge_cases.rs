//! Partition Edge Case Tests
//!
//! Boundary conditions of the decimation/gap-filling pipeline: degenerate
//! windows, interval ends landing exactly on sample points, windows larger
//! than the store's coverage, and resolutions larger than the window.

use std::sync::Arc;
use timegraph_render::render::{RenderOrchestrator, RenderOrchestratorBuilder};
use timegraph_render::store::{MemoryStateStore, StateValue};
use timegraph_render::types::{CancelToken, TimeRange};
use timegraph_render::{DisplayInterval, StateRender, StateStore, TreeElement};

fn store_with(intervals: &[(i64, i64)]) -> Arc<MemoryStateStore> {
    let store = Arc::new(MemoryStateStore::new(0));
    let attr = store.add_attribute("attr");
    let mut t = 0;
    for &(end, value) in intervals {
        store.modify_attribute(attr, StateValue::Int(value), t);
        t = end + 1;
    }
    store.advance_time(t - 1);
    store
}

fn render(
    orchestrator: &RenderOrchestrator,
    range: TimeRange,
    resolution: i64,
) -> StateRender {
    let element = Arc::new(TreeElement::leaf("attr", 0));
    orchestrator
        .state_render(&element, range, resolution, &CancelToken::new())
        .unwrap()
}

fn bound(store: &Arc<MemoryStateStore>) -> RenderOrchestrator {
    let orchestrator = RenderOrchestratorBuilder::new("edge cases").build();
    orchestrator.bind_store(Arc::clone(store) as Arc<dyn StateStore>);
    orchestrator
}

fn assert_partition(render: &StateRender) {
    let range = render.time_range;
    assert!(!render.intervals.is_empty());
    assert_eq!(render.intervals.first().unwrap().start(), range.start);
    assert_eq!(render.intervals.last().unwrap().end(), range.end);
    for pair in render.intervals.windows(2) {
        assert_eq!(pair[0].end() + 1, pair[1].start());
    }
}

#[test]
fn test_degenerate_window_over_covered_instant() {
    let store = store_with(&[(100, 1)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(40, 40), 10);
    assert_partition(&result);
    assert_eq!(result.intervals.len(), 1);
    assert!(result.intervals[0].is_real());
    assert_eq!(
        (result.intervals[0].start(), result.intervals[0].end()),
        (40, 40)
    );
}

#[test]
fn test_degenerate_window_past_store_end() {
    let store = store_with(&[(100, 1)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(500, 500), 10);
    assert_eq!(result.intervals, vec![DisplayInterval::aggregate(500, 500)]);
}

#[test]
fn test_resolution_larger_than_window() {
    // A 10-wide window sampled at resolution 50: only the final-bucket test
    // runs, and the covering interval spans the whole window.
    let store = store_with(&[(100, 1)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(20, 30), 50);
    assert_partition(&result);
    assert_eq!(result.intervals.len(), 1);
    assert!(result.intervals[0].is_real());
}

#[test]
fn test_interval_end_on_exact_bucket_boundary() {
    // [0,20] ends exactly on the ts=20 sample point. The sampler must step
    // strictly past it: the next query lands at 30, and [21,100] is
    // accepted there, leaving [21,29] to the gap filler.
    let store = store_with(&[(20, 1), (100, 2)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(0, 100), 10);
    assert_partition(&result);
    assert_eq!(result.intervals.len(), 3);
    assert!(result.intervals[0].is_real());
    assert_eq!(result.intervals[1], DisplayInterval::aggregate(21, 29));
    assert_eq!(
        (result.intervals[2].start(), result.intervals[2].end()),
        (30, 100)
    );
}

#[test]
fn test_interval_end_one_short_of_boundary() {
    // [0,19] misses the ts=20 point by one; the next accept happens at 20
    // and the spans stay adjacent, so no filler appears.
    let store = store_with(&[(19, 1), (100, 2)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(0, 100), 10);
    assert_partition(&result);
    assert_eq!(result.intervals.len(), 2);
    assert!(result.intervals.iter().all(DisplayInterval::is_real));
    assert_eq!(
        (result.intervals[0].start(), result.intervals[0].end()),
        (0, 19)
    );
    assert_eq!(
        (result.intervals[1].start(), result.intervals[1].end()),
        (20, 100)
    );
}

#[test]
fn test_window_entirely_past_store_coverage() {
    let store = store_with(&[(100, 1)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(200, 400), 10);
    assert_eq!(result.intervals, vec![DisplayInterval::aggregate(200, 400)]);
}

#[test]
fn test_raw_end_is_clamped_to_window() {
    // The covering interval extends far past the window end; the display
    // span must stop at t2 so the partition holds.
    let store = store_with(&[(10_000, 1)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(0, 100), 10);
    assert_partition(&result);
    assert_eq!(result.intervals.len(), 1);
    assert_eq!(
        (result.intervals[0].start(), result.intervals[0].end()),
        (0, 100)
    );
}

#[test]
fn test_unaligned_window_start() {
    // Sample points align to the window start, not to zero.
    let store = store_with(&[(6, 1), (103, 2)]);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(3, 103), 10);
    assert_partition(&result);
    // ts=3 queries [0,6]=1 (too short); ts=13 accepts [7,103]=2.
    assert_eq!(result.intervals[0], DisplayInterval::aggregate(3, 12));
    assert_eq!(
        (result.intervals[1].start(), result.intervals[1].end()),
        (13, 103)
    );
}

#[test]
fn test_dense_history_decimates_to_aggregate() {
    let store = Arc::new(MemoryStateStore::new(0));
    let attr = store.add_attribute("dense");
    for i in 0..5_000 {
        store.modify_attribute(attr, StateValue::Int(i % 3), i);
    }
    store.advance_time(4_999);
    let orchestrator = bound(&store);

    let result = render(&orchestrator, TimeRange::new(0, 4_999), 500);
    // No raw interval covers a 500-wide bucket; one aggregate spans it all.
    assert_eq!(
        result.intervals,
        vec![DisplayInterval::aggregate(0, 4_999)]
    );
}
