//! Render pipeline: decimation, gap filling, mapping and tree caching
//!
//! Turns an unbounded, fine-grained interval history into a bounded,
//! gap-free, resolution-matched sequence suitable for display, plus a cached
//! snapshot of the tree of displayed entities.
//!
//! # Architecture
//!
//! ```text
//! state_render(element, window, resolution, cancel)
//!      │
//!      ▼
//! ┌──────────────┐
//! │   Sampler    │  one point query per resolution bucket,
//! └──────────────┘  keep intervals covering a whole bucket
//!      │
//!      ▼
//! ┌──────────────┐
//! │   Mapper     │  injected functions: name, label, color,
//! └──────────────┘  thickness, properties per accepted interval
//!      │
//!      ▼
//! ┌──────────────┐
//! │  Gap filler  │  aggregate intervals close every hole:
//! └──────────────┘  output exactly partitions the window
//!      │
//!      ▼
//!  StateRender
//!
//! tree_render() ──▶ TreeRenderCache ──▶ injected tree strategy
//!                   (per store, valid while the attribute
//!                    count is unchanged)
//! ```

pub mod filler;
pub mod mapper;
pub mod orchestrator;
pub mod sampler;
pub mod states;
pub mod tree;
pub mod tree_cache;

pub use mapper::{IntervalContext, IntervalMapper};
pub use orchestrator::{RenderOrchestrator, RenderOrchestratorBuilder, TreeBuildFn, TreeContext};
pub use sampler::SampledInterval;
pub use states::{AggregateInterval, DisplayInterval, RealInterval, StateRender};
pub use tree::{TreeElement, TreeRender};
pub use tree_cache::TreeRenderCache;
