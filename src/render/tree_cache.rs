//! Cached tree renders, one per store instance
//!
//! Building a tree render means a full-state query plus the injected
//! tree-building strategy, which is expensive enough to cache. A cached
//! render stays valid exactly as long as the store's attribute count does
//! not change: attributes are only ever added, so a count match means the
//! snapshot cannot be stale in either direction.
//!
//! The cache is keyed by store identity and holds only a `Weak` reference
//! to the store, so it never keeps one alive. Owners should still call
//! [`TreeRenderCache::forget`] when they dispose a store; dangling entries
//! are also swept opportunistically.

use crate::error::Result;
use crate::render::tree::TreeRender;
use crate::store::{StateStore, StoreId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

struct CachedTreeRender {
    attribute_count: usize,
    render: Arc<TreeRender>,
    store: Weak<dyn StateStore>,
}

type Slot = Arc<Mutex<Option<CachedTreeRender>>>;

/// Per-store cache of tree render snapshots
#[derive(Default)]
pub struct TreeRenderCache {
    entries: RwLock<HashMap<StoreId, Slot>>,
}

impl TreeRenderCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached render for `store`, or build and install a fresh one
    ///
    /// The check/compare/build/install sequence runs under a critical section
    /// scoped to this store only; requests for other stores proceed
    /// unimpeded. On a hit the previously installed `Arc` is returned
    /// unchanged, so callers can detect reuse by reference identity.
    pub fn get_or_build<F>(&self, store: &Arc<dyn StateStore>, build: F) -> Result<Arc<TreeRender>>
    where
        F: FnOnce() -> Result<TreeRender>,
    {
        let id = store.id();
        let slot = self.slot(id);
        let mut entry = slot.lock();

        let attribute_count = store.attribute_count()?;
        if let Some(cached) = entry.as_ref() {
            if cached.attribute_count == attribute_count {
                trace!(store = %id, attributes = attribute_count, "tree render cache hit");
                return Ok(Arc::clone(&cached.render));
            }
            debug!(
                store = %id,
                cached = cached.attribute_count,
                current = attribute_count,
                "tree render outdated, rebuilding"
            );
        }

        let render = Arc::new(build()?);
        *entry = Some(CachedTreeRender {
            attribute_count,
            render: Arc::clone(&render),
            store: Arc::downgrade(store),
        });
        Ok(render)
    }

    /// Drop the entry for a store whose lifecycle has ended
    ///
    /// Tolerates ids the cache never saw.
    pub fn forget(&self, id: StoreId) {
        if self.entries.write().remove(&id).is_some() {
            debug!(store = %id, "tree render cache entry dropped");
        }
    }

    /// Sweep entries whose store is no longer reachable
    pub fn prune(&self) {
        self.entries.write().retain(|_, slot| Self::slot_is_live(slot));
    }

    /// Drop every entry (used when the tree configuration changes)
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stores currently tracked
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache tracks no store at all
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn slot(&self, id: StoreId) -> Slot {
        if let Some(slot) = self.entries.read().get(&id) {
            return Arc::clone(slot);
        }
        let mut entries = self.entries.write();
        // Dead stores are swept whenever a new one shows up.
        entries.retain(|_, slot| Self::slot_is_live(slot));
        Arc::clone(entries.entry(id).or_default())
    }

    fn slot_is_live(slot: &Slot) -> bool {
        // A locked slot is in active use; never block the shared map on it.
        match slot.try_lock() {
            Some(guard) => guard
                .as_ref()
                .map_or(true, |cached| cached.store.strong_count() > 0),
            None => true,
        }
    }
}
