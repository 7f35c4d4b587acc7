//! Bounded LRU cache of route search results.
//!
//! Keys normalise the request so equivalent searches share an entry: waypoint
//! and avoid lists are sorted, and the graph fingerprint ties each entry to
//! the graph it was computed on. Jump bounds are compared exactly, since any
//! difference can change which edges a search may use. Failed searches are
//! never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::catalog::StarId;
use crate::error::Result;
use crate::graph::NavGraph;
use crate::route::RouteDescriptor;
use crate::routing::{find_route, find_routes, RouteConstraints};

/// Entries kept by [`RouteCache::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Normalised search parameters.
///
/// `k` is the number of ranked routes requested, or 0 for a single
/// [`find_route`] lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteCacheKey {
    start: StarId,
    goal: StarId,
    max_jump_bits: Option<u64>,
    min_jump_bits: Option<u64>,
    k: usize,
    must_visit: Vec<StarId>,
    keep_waypoint_order: bool,
    avoid: Vec<StarId>,
    fingerprint: u64,
}

impl RouteCacheKey {
    pub fn new(
        graph: &NavGraph,
        start: &str,
        goal: &str,
        constraints: &RouteConstraints,
        k: usize,
    ) -> Self {
        let mut must_visit = constraints.must_visit.clone();
        if !constraints.keep_waypoint_order {
            must_visit.sort();
            must_visit.dedup();
        }

        Self {
            start: start.to_string(),
            goal: goal.to_string(),
            max_jump_bits: constraints.max_jump_distance.map(bound_bits),
            min_jump_bits: constraints.min_jump_distance.map(bound_bits),
            k,
            must_visit,
            keep_waypoint_order: constraints.keep_waypoint_order,
            // BTreeSet iteration is already sorted.
            avoid: constraints.avoid.iter().cloned().collect(),
            fingerprint: graph.fingerprint(),
        }
    }
}

fn bound_bits(value: f64) -> u64 {
    // -0.0 and 0.0 filter the same edges.
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Hit / miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, or 0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<RouteCacheKey, (Vec<RouteDescriptor>, u64)>,
    clock: u64,
}

/// Thread-safe LRU cache for [`find_route`] and [`find_routes`] results.
#[derive(Debug)]
pub struct RouteCache {
    capacity: usize,
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!(capacity, "route cache initialised");
        Self {
            capacity,
            state: RwLock::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a cached result, marking it most recently used.
    pub fn get(&self, key: &RouteCacheKey) -> Option<Vec<RouteDescriptor>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.clock += 1;
        let now = state.clock;
        match state.entries.get_mut(key) {
            Some((routes, used)) => {
                *used = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(start = %key.start, goal = %key.goal, "route cache hit");
                Some(routes.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(start = %key.start, goal = %key.goal, "route cache miss");
                None
            }
        }
    }

    /// Store `routes`, evicting the least recently used entry when full.
    pub fn put(&self, key: RouteCacheKey, routes: Vec<RouteDescriptor>) {
        if routes.is_empty() {
            return;
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.clock += 1;
        let now = state.clock;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let eldest = state
                .entries
                .iter()
                .min_by_key(|(_, (_, used))| *used)
                .map(|(key, _)| key.clone());
            if let Some(eldest) = eldest {
                debug!(start = %eldest.start, goal = %eldest.goal, "evicting route cache entry");
                state.entries.remove(&eldest);
            }
        }

        state.entries.insert(key, (routes, now));
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let removed = state.entries.len();
        state.entries.clear();
        info!(removed, "route cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// [`find_route`] through the cache.
    pub fn find_route(
        &self,
        graph: &NavGraph,
        start: &str,
        goal: &str,
        constraints: &RouteConstraints,
    ) -> Result<RouteDescriptor> {
        // Ranked results are renamed, so single lookups get their own key.
        let key = RouteCacheKey::new(graph, start, goal, constraints, 0);
        if let Some(route) = self.get(&key).and_then(|routes| routes.into_iter().next()) {
            return Ok(route);
        }

        let route = find_route(graph, start, goal, constraints)?;
        self.put(key, vec![route.clone()]);
        Ok(route)
    }

    /// [`find_routes`] through the cache.
    pub fn find_routes(
        &self,
        graph: &NavGraph,
        start: &str,
        goal: &str,
        constraints: &RouteConstraints,
        k: usize,
    ) -> Result<Vec<RouteDescriptor>> {
        let key = RouteCacheKey::new(graph, start, goal, constraints, k);
        if let Some(routes) = self.get(&key) {
            return Ok(routes);
        }

        let routes = find_routes(graph, start, goal, constraints, k)?;
        self.put(key, routes.clone());
        Ok(routes)
    }
}
