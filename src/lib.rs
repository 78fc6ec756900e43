//! Timegraph render engine - decimation and render caching over an external
//! state-interval store
//!
//! This library turns the unbounded, fine-grained state history of a trace
//! into what a time-graph view can actually draw:
//!
//! - **Decimation**: at most one point query per resolution bucket, so the
//!   display resolution bounds the work, not the trace density
//! - **Gap-free output**: every state render is an exact partition of the
//!   requested window, with aggregate "too fine to render" intervals closing
//!   the holes the decimation leaves
//! - **Tree caching**: the hierarchy of displayed entities is cached per
//!   store instance and rebuilt only when the store's attribute count grows
//! - **Safe degradation**: disposed stores, missing attributes and cancelled
//!   requests yield the empty render for the affected call only
//!
//! The interval store itself is an external collaborator behind the
//! [`store::StateStore`] trait; this crate never parses traces and never
//! persists anything.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use timegraph_render::render::RenderOrchestratorBuilder;
//! use timegraph_render::store::{MemoryStateStore, StateValue};
//! use timegraph_render::types::{CancelToken, TimeRange};
//!
//! let store = Arc::new(MemoryStateStore::new(0));
//! let cpu = store.add_attribute("cpu0");
//! store.modify_attribute(cpu, StateValue::Int(1), 0);
//! store.modify_attribute(cpu, StateValue::Int(2), 500);
//! store.advance_time(1_000);
//!
//! let orchestrator = RenderOrchestratorBuilder::new("states").build();
//! orchestrator.bind_store(store);
//!
//! let tree = orchestrator.tree_render();
//! let elements = tree.all_elements();
//! let render = orchestrator
//!     .state_render(&elements[1], TimeRange::new(0, 1_000), 100, &CancelToken::new())
//!     .unwrap();
//! assert!(!render.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod render;
pub mod store;
pub mod types;

// Re-export main types
pub use error::{RenderError, Result};
pub use render::{
    DisplayInterval, IntervalMapper, RenderOrchestrator, RenderOrchestratorBuilder, StateRender,
    TreeElement, TreeRender,
};
pub use store::{AttributeId, StateInterval, StateStore, StateValue, StoreId};
pub use types::{CancelToken, TimeRange};
