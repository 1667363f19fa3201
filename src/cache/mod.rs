//! Cached route responses and their invalidation
//!
//! Read endpoints store their JSON output here, keyed by route path and by a
//! variant key (normalized query string). Mutations purge a whole path through
//! [`CacheInvalidator::revalidate_path`]; the next read recomputes it.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Route of the invoice listing, revalidated after every mutation
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Renderings kept per path before the oldest is evicted
pub const DEFAULT_MAX_VARIANTS: usize = 64;

/// Capability to drop cached renderings of a route
pub trait CacheInvalidator: Send + Sync {
    /// Purge every cached rendering keyed by `path`
    fn revalidate_path(&self, path: &str);
}

#[derive(Default)]
struct CachedPath {
    /// Bumped by every revalidation of the path
    generation: u64,
    /// Oldest first
    variants: IndexMap<String, Value>,
}

/// In-process cache of route responses
///
/// Cloning shares the underlying storage. Each path holds at most
/// `max_variants` renderings; inserting past that evicts the oldest.
///
/// A reader that computes a page while a mutation revalidates the path must
/// not put its stale result back. Take [`generation`](Self::generation)
/// before reading the store and store through
/// [`insert_if_current`](Self::insert_if_current).
#[derive(Clone)]
pub struct PageCache {
    paths: Arc<RwLock<HashMap<String, CachedPath>>>,
    max_variants: usize,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_max_variants(DEFAULT_MAX_VARIANTS)
    }
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache keeping at most `max_variants` renderings per path (minimum 1)
    pub fn with_max_variants(max_variants: usize) -> Self {
        Self {
            paths: Arc::new(RwLock::new(HashMap::new())),
            max_variants: max_variants.max(1),
        }
    }

    pub fn get(&self, path: &str, variant: &str) -> Option<Value> {
        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        paths
            .get(path)
            .and_then(|cached| cached.variants.get(variant))
            .cloned()
    }

    /// Current generation of `path`
    pub fn generation(&self, path: &str) -> u64 {
        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        paths.get(path).map_or(0, |cached| cached.generation)
    }

    /// Store a rendering unconditionally
    pub fn insert(&self, path: &str, variant: impl Into<String>, page: Value) {
        let mut paths = self.paths.write().unwrap_or_else(PoisonError::into_inner);
        let cached = paths.entry(path.to_string()).or_default();
        Self::put(cached, self.max_variants, variant.into(), page);
    }

    /// Store a rendering computed at `generation`
    ///
    /// Returns `false` and drops `page` if `path` was revalidated since.
    pub fn insert_if_current(
        &self,
        path: &str,
        generation: u64,
        variant: impl Into<String>,
        page: Value,
    ) -> bool {
        let mut paths = self.paths.write().unwrap_or_else(PoisonError::into_inner);
        let cached = paths.entry(path.to_string()).or_default();
        if cached.generation != generation {
            tracing::debug!(
                path,
                generation,
                current = cached.generation,
                "Discarded stale rendering"
            );
            return false;
        }
        Self::put(cached, self.max_variants, variant.into(), page);
        true
    }

    fn put(cached: &mut CachedPath, max_variants: usize, variant: String, page: Value) {
        if !cached.variants.contains_key(&variant) {
            while cached.variants.len() >= max_variants {
                cached.variants.shift_remove_index(0);
            }
        }
        cached.variants.insert(variant, page);
    }

    /// Whether any rendering of `path` is cached
    pub fn contains_path(&self, path: &str) -> bool {
        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        paths
            .get(path)
            .is_some_and(|cached| !cached.variants.is_empty())
    }

    /// Total number of cached renderings across all paths
    pub fn len(&self) -> usize {
        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        paths.values().map(|cached| cached.variants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheInvalidator for PageCache {
    fn revalidate_path(&self, path: &str) {
        let mut paths = self.paths.write().unwrap_or_else(PoisonError::into_inner);
        let cached = paths.entry(path.to_string()).or_default();
        cached.generation += 1;
        let dropped = cached.variants.len();
        cached.variants.clear();
        tracing::debug!(path, entries = dropped, "Revalidated cached path");
    }
}
