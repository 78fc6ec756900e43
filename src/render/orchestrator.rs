//! Public entry points of the render engine
//!
//! The orchestrator composes the sampler, the gap filler, the interval
//! mapper and the tree cache into the two operations the view layer calls:
//! `tree_render` and `state_render`. Each call is stateless given a store
//! snapshot and repeatable; failures degrade to the empty render for that
//! call only and never abort sibling calls running on other worker threads.

use crate::error::{RenderError, Result};
use crate::render::filler;
use crate::render::mapper::{IntervalContext, IntervalMapper};
use crate::render::sampler;
use crate::render::states::{DisplayInterval, StateRender};
use crate::render::tree::{TreeElement, TreeRender};
use crate::render::tree_cache::TreeRenderCache;
use crate::store::{StateInterval, StateStore, StoreId};
use crate::types::{CancelToken, FilterMode, SortMode, TimeRange};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Inputs handed to the injected tree-building strategy
///
/// Contains everything needed to produce the tree for the current
/// configuration. The strategy must be a pure function of these inputs and
/// must not retain the store beyond the call.
pub struct TreeContext<'a> {
    /// The backing store
    pub store: &'a dyn StateStore,
    /// Currently selected sort mode
    pub sort_mode: &'a SortMode,
    /// Currently active filter modes
    pub filter_modes: &'a [FilterMode],
    /// Full state at the store's start time, in attribute order
    pub full_state_at_start: &'a [StateInterval],
}

/// Injected tree-building strategy
pub type TreeBuildFn = Arc<dyn Fn(&TreeContext<'_>) -> TreeRender + Send + Sync>;

/// Composes decimation, gap filling, mapping and tree caching per request
///
/// Built through [`RenderOrchestratorBuilder`]. A store is bound per
/// request context with [`bind_store`](Self::bind_store); while none is
/// bound every request degrades to the empty render.
pub struct RenderOrchestrator {
    name: String,
    store: RwLock<Option<Arc<dyn StateStore>>>,
    tree_cache: TreeRenderCache,
    tree_build_fn: TreeBuildFn,
    mapper: IntervalMapper,
    sort_modes: Vec<SortMode>,
    filter_modes: Vec<FilterMode>,
    current_sort: RwLock<SortMode>,
    active_filters: RwLock<Vec<FilterMode>>,
    full_state_lookup: bool,
}

impl RenderOrchestrator {
    /// Display name of this provider
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the store subsequent requests will query
    pub fn bind_store(&self, store: Arc<dyn StateStore>) {
        *self.store.write() = Some(store);
    }

    /// Unbind the current store; requests degrade to empty until a new one
    /// is bound
    pub fn unbind_store(&self) {
        *self.store.write() = None;
    }

    /// The currently bound store, if any
    pub fn store(&self) -> Option<Arc<dyn StateStore>> {
        self.store.read().clone()
    }

    /// Disposal hook: drop the cache entry for a store whose lifecycle has
    /// ended, and unbind it if it is the bound one
    ///
    /// Tolerates stores this orchestrator never saw.
    pub fn on_store_disposed(&self, id: StoreId) {
        self.tree_cache.forget(id);
        let mut bound = self.store.write();
        if bound.as_ref().map_or(false, |s| s.id() == id) {
            *bound = None;
        }
    }

    /// Sort modes this provider offers
    pub fn sort_modes(&self) -> &[SortMode] {
        &self.sort_modes
    }

    /// Filter modes this provider offers
    pub fn filter_modes(&self) -> &[FilterMode] {
        &self.filter_modes
    }

    /// The currently selected sort mode
    pub fn current_sort_mode(&self) -> SortMode {
        self.current_sort.read().clone()
    }

    /// The currently active filter modes
    pub fn active_filter_modes(&self) -> Vec<FilterMode> {
        self.active_filters.read().clone()
    }

    /// Select the sort mode used by future tree renders
    ///
    /// The tree shape is a function of the configuration, so cached
    /// snapshots are dropped.
    pub fn set_sort_mode(&self, mode: SortMode) {
        *self.current_sort.write() = mode;
        self.tree_cache.clear();
    }

    /// Activate a filter mode (no-op if already active)
    pub fn enable_filter_mode(&self, mode: FilterMode) {
        let mut active = self.active_filters.write();
        if !active.contains(&mode) {
            active.push(mode);
            drop(active);
            self.tree_cache.clear();
        }
    }

    /// Deactivate a filter mode (no-op if not active)
    pub fn disable_filter_mode(&self, mode: &FilterMode) {
        let mut active = self.active_filters.write();
        let before = active.len();
        active.retain(|m| m != mode);
        if active.len() != before {
            drop(active);
            self.tree_cache.clear();
        }
    }

    /// The tree of elements to display
    ///
    /// Served from the per-store cache while the store's attribute count is
    /// unchanged. Returns the empty render when no store is bound or the
    /// store fails; the failure is scoped to this call.
    pub fn tree_render(&self) -> Arc<TreeRender> {
        let Some(store) = self.store() else {
            debug!(provider = %self.name, "tree render requested with no bound store");
            return Arc::new(TreeRender::empty());
        };
        match self.cached_tree_render(&store) {
            Ok(render) => render,
            Err(err) => {
                debug!(provider = %self.name, error = %err, "degrading tree render to empty");
                Arc::new(TreeRender::empty())
            }
        }
    }

    /// The state intervals of one element over one window
    ///
    /// Returns `Err` only for a malformed window (`end < start` or
    /// `resolution <= 0`). Everything else that can go wrong — element
    /// without an attribute, no store bound, store disposed or attribute
    /// missing mid-query, cancellation — yields the empty sentinel for this
    /// call only. A non-empty result is always an exact partition of the
    /// window.
    pub fn state_render(
        &self,
        element: &Arc<TreeElement>,
        time_range: TimeRange,
        resolution: i64,
        cancel: &CancelToken,
    ) -> Result<StateRender> {
        if time_range.end < time_range.start || resolution <= 0 {
            return Err(RenderError::InvalidWindow {
                start: time_range.start,
                end: time_range.end,
                resolution,
            });
        }
        let Some(attribute) = element.source_attribute() else {
            // Grouping rows have nothing to draw; this is the sentinel, not
            // a window-spanning aggregate.
            return Ok(StateRender::empty(time_range, Arc::clone(element)));
        };

        match self.query_history_range(element, attribute, time_range, resolution, cancel) {
            Ok(intervals) => Ok(StateRender::new(
                time_range,
                Arc::clone(element),
                intervals,
            )),
            Err(err) if err.is_degradable() => {
                debug!(
                    provider = %self.name,
                    element = element.name(),
                    error = %err,
                    "degrading state render to empty"
                );
                Ok(StateRender::empty(time_range, Arc::clone(element)))
            }
            Err(err) => Err(err),
        }
    }

    fn cached_tree_render(&self, store: &Arc<dyn StateStore>) -> Result<Arc<TreeRender>> {
        self.tree_cache.get_or_build(store, || {
            let full_state = store.query_full_state(store.start_time()?)?;
            let sort_mode = self.current_sort.read().clone();
            let filters = self.active_filters.read().clone();
            let ctx = TreeContext {
                store: store.as_ref(),
                sort_mode: &sort_mode,
                filter_modes: &filters,
                full_state_at_start: &full_state,
            };
            Ok((self.tree_build_fn)(&ctx))
        })
    }

    fn query_history_range(
        &self,
        element: &Arc<TreeElement>,
        attribute: crate::store::AttributeId,
        range: TimeRange,
        resolution: i64,
        cancel: &CancelToken,
    ) -> Result<Vec<DisplayInterval>> {
        let store = self.store().ok_or(RenderError::StoreUnavailable)?;
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        let sampled = sampler::sample(
            store.as_ref(),
            attribute,
            range.start,
            range.end,
            resolution,
            cancel,
        )?;

        let mut reals = Vec::with_capacity(sampled.len());
        for sampled_interval in sampled {
            let full_state = if self.full_state_lookup {
                store.query_full_state(sampled_interval.source.start)?
            } else {
                Vec::new()
            };
            let ctx = IntervalContext {
                store: store.as_ref(),
                element: element.as_ref(),
                source: &sampled_interval.source,
                full_state: &full_state,
            };
            reals.push(DisplayInterval::Real(self.mapper.map(
                &ctx,
                sampled_interval.start,
                sampled_interval.end,
            )));
        }

        Ok(filler::fill_gaps(reals, range.start, range.end))
    }
}

/// Builder for [`RenderOrchestrator`]
///
/// All strategies are function-valued configuration; the defaults give a
/// flat tree (one leaf per attribute, named by the store) and value-derived
/// interval styling.
pub struct RenderOrchestratorBuilder {
    name: String,
    tree_build_fn: TreeBuildFn,
    mapper: IntervalMapper,
    sort_modes: Vec<SortMode>,
    filter_modes: Vec<FilterMode>,
    full_state_lookup: bool,
}

impl RenderOrchestratorBuilder {
    /// Start building a provider with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tree_build_fn: Arc::new(default_tree_build),
            mapper: IntervalMapper::default(),
            sort_modes: Vec::new(),
            filter_modes: Vec::new(),
            full_state_lookup: false,
        }
    }

    /// Replace the tree-building strategy
    pub fn with_tree_build_fn(
        mut self,
        f: impl Fn(&TreeContext<'_>) -> TreeRender + Send + Sync + 'static,
    ) -> Self {
        self.tree_build_fn = Arc::new(f);
        self
    }

    /// Replace the interval mapper
    pub fn with_mapper(mut self, mapper: IntervalMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Declare the sort modes the tree-building strategy understands
    ///
    /// The first one becomes the initial selection.
    pub fn with_sort_modes(mut self, modes: Vec<SortMode>) -> Self {
        self.sort_modes = modes;
        self
    }

    /// Declare the filter modes the tree-building strategy understands
    ///
    /// None are active initially.
    pub fn with_filter_modes(mut self, modes: Vec<FilterMode>) -> Self {
        self.filter_modes = modes;
        self
    }

    /// Fetch the full state at each accepted interval's start time and hand
    /// it to the mapping functions
    ///
    /// Off by default: it costs one full-state query per accepted interval.
    pub fn with_full_state_lookup(mut self, enabled: bool) -> Self {
        self.full_state_lookup = enabled;
        self
    }

    /// Finish building
    pub fn build(self) -> RenderOrchestrator {
        let mut sort_modes = self.sort_modes;
        if sort_modes.is_empty() {
            sort_modes.push(SortMode::new("store order"));
        }
        let current_sort = sort_modes[0].clone();
        RenderOrchestrator {
            name: self.name,
            store: RwLock::new(None),
            tree_cache: TreeRenderCache::new(),
            tree_build_fn: self.tree_build_fn,
            mapper: self.mapper,
            sort_modes,
            filter_modes: self.filter_modes,
            current_sort: RwLock::new(current_sort),
            active_filters: RwLock::new(Vec::new()),
            full_state_lookup: self.full_state_lookup,
        }
    }
}

/// Default strategy: a flat tree with one leaf per attribute, in store
/// order, ignoring sort and filter modes
fn default_tree_build(ctx: &TreeContext<'_>) -> TreeRender {
    let children = ctx
        .full_state_at_start
        .iter()
        .map(|interval| {
            let name = ctx
                .store
                .attribute_name(interval.attribute)
                .unwrap_or_else(|_| format!("attribute {}", interval.attribute));
            Arc::new(TreeElement::leaf(name, interval.attribute))
        })
        .collect();
    TreeRender::new(Arc::new(TreeElement::group("root", children)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStateStore, StateValue};

    fn orchestrator_with_store() -> (RenderOrchestrator, Arc<MemoryStateStore>) {
        let store = Arc::new(MemoryStateStore::new(0));
        let attr = store.add_attribute("cpu0");
        store.modify_attribute(attr, StateValue::Int(1), 0);
        store.advance_time(100);

        let orchestrator = RenderOrchestratorBuilder::new("test states").build();
        orchestrator.bind_store(Arc::clone(&store) as Arc<dyn StateStore>);
        (orchestrator, store)
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let (orchestrator, _store) = orchestrator_with_store();
        let element = Arc::new(TreeElement::leaf("cpu0", 0));

        let err = orchestrator
            .state_render(&element, TimeRange::new(10, 0), 1, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidWindow { .. }));

        let err = orchestrator
            .state_render(&element, TimeRange::new(0, 10), 0, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidWindow { .. }));
    }

    #[test]
    fn test_element_without_attribute_is_empty() {
        let (orchestrator, _store) = orchestrator_with_store();
        let group = Arc::new(TreeElement::group("group", Vec::new()));
        let render = orchestrator
            .state_render(&group, TimeRange::new(0, 100), 10, &CancelToken::new())
            .unwrap();
        assert!(render.is_empty());
    }

    #[test]
    fn test_no_store_is_empty() {
        let orchestrator = RenderOrchestratorBuilder::new("unbound").build();
        let element = Arc::new(TreeElement::leaf("cpu0", 0));
        let render = orchestrator
            .state_render(&element, TimeRange::new(0, 100), 10, &CancelToken::new())
            .unwrap();
        assert!(render.is_empty());
        assert!(orchestrator.tree_render().is_empty());
    }

    #[test]
    fn test_cancelled_before_start_is_empty() {
        let (orchestrator, _store) = orchestrator_with_store();
        let element = Arc::new(TreeElement::leaf("cpu0", 0));
        let cancel = CancelToken::new();
        cancel.cancel();
        let render = orchestrator
            .state_render(&element, TimeRange::new(0, 100), 10, &cancel)
            .unwrap();
        assert!(render.is_empty());
    }

    #[test]
    fn test_missing_attribute_degrades_for_that_element_only() {
        let (orchestrator, _store) = orchestrator_with_store();
        let bogus = Arc::new(TreeElement::leaf("ghost", 42));
        let render = orchestrator
            .state_render(&bogus, TimeRange::new(0, 100), 10, &CancelToken::new())
            .unwrap();
        assert!(render.is_empty());

        // A sibling element with a real attribute still renders.
        let element = Arc::new(TreeElement::leaf("cpu0", 0));
        let render = orchestrator
            .state_render(&element, TimeRange::new(0, 100), 10, &CancelToken::new())
            .unwrap();
        assert!(!render.is_empty());
    }

    #[test]
    fn test_default_tree_build() {
        let (orchestrator, store) = orchestrator_with_store();
        store.add_attribute("cpu1");
        let tree = orchestrator.tree_render();
        let elements = tree.all_elements();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[1].name(), "cpu0");
        assert_eq!(elements[2].name(), "cpu1");
    }

    #[test]
    fn test_disposed_store_hook_unbinds() {
        let (orchestrator, store) = orchestrator_with_store();
        orchestrator.tree_render();
        orchestrator.on_store_disposed(store.id());
        assert!(orchestrator.store().is_none());
        assert!(orchestrator.tree_render().is_empty());
    }

    #[test]
    fn test_sort_mode_defaults() {
        let orchestrator = RenderOrchestratorBuilder::new("p").build();
        assert_eq!(orchestrator.current_sort_mode().name(), "store order");
        assert!(orchestrator.active_filter_modes().is_empty());
    }
}
