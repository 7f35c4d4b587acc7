//! Waypoint ordering strategies.
//!
//! A route with required waypoints is a chain of ordinary shortest-path legs.
//! The [`WaypointStrategy`] trait decides the order in which waypoints are
//! visited; [`select_strategy`] picks an implementation for a request.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::graph::NavGraph;
use crate::path::{compare_paths, shortest_path, PathCandidate, SearchMask};

/// Largest waypoint count ordered by exhaustive permutation search.
pub const MAX_EXACT_WAYPOINTS: usize = 7;

/// How a strategy orders waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointOrdering {
    /// Waypoints are visited in the caller's order.
    Fixed,
    /// Every permutation is tried; the result is optimal.
    Exact,
    /// Greedy closest-next ordering; the result may be suboptimal.
    NearestNeighbour,
}

/// Memoized single-leg searches over one graph and mask.
pub struct LegTable<'a> {
    graph: &'a NavGraph,
    mask: &'a SearchMask,
    legs: HashMap<(usize, usize), Option<PathCandidate>>,
}

impl<'a> LegTable<'a> {
    pub fn new(graph: &'a NavGraph, mask: &'a SearchMask) -> Self {
        Self {
            graph,
            mask,
            legs: HashMap::new(),
        }
    }

    /// Best path from `from` to `to`, computed at most once per pair.
    pub fn leg(&mut self, from: usize, to: usize) -> Option<PathCandidate> {
        let (graph, mask) = (self.graph, self.mask);
        self.legs
            .entry((from, to))
            .or_insert_with(|| shortest_path(graph, from, to, mask))
            .clone()
    }

    /// Walk `start`, each of `order`, then `goal`.
    pub fn walk(&mut self, start: usize, order: &[usize], goal: usize) -> Option<PathCandidate> {
        let mut path = PathCandidate::single(start);
        let mut current = start;
        for &next in order.iter().chain(std::iter::once(&goal)) {
            let leg = self.leg(current, next)?;
            path = path.join(&leg);
            current = next;
        }
        Some(path)
    }

    /// Number of distinct legs searched so far.
    pub fn searched(&self) -> usize {
        self.legs.len()
    }
}

impl fmt::Debug for LegTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegTable")
            .field("searched", &self.legs.len())
            .finish()
    }
}

/// Strategy for chaining a route through waypoints.
pub trait WaypointStrategy: Send + Sync {
    fn ordering(&self) -> WaypointOrdering;

    /// Route from `start` through every waypoint to `goal`, or `None` if some
    /// required leg is unreachable.
    fn chain(
        &self,
        legs: &mut LegTable<'_>,
        start: usize,
        goal: usize,
        waypoints: &[usize],
    ) -> Option<PathCandidate>;
}

/// Visits waypoints in the order given.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOrderer;

impl WaypointStrategy for FixedOrderer {
    fn ordering(&self) -> WaypointOrdering {
        WaypointOrdering::Fixed
    }

    fn chain(
        &self,
        legs: &mut LegTable<'_>,
        start: usize,
        goal: usize,
        waypoints: &[usize],
    ) -> Option<PathCandidate> {
        legs.walk(start, waypoints, goal)
    }
}

/// Tries every visiting order and keeps the best-ranked route.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOrderer;

impl WaypointStrategy for ExactOrderer {
    fn ordering(&self) -> WaypointOrdering {
        WaypointOrdering::Exact
    }

    fn chain(
        &self,
        legs: &mut LegTable<'_>,
        start: usize,
        goal: usize,
        waypoints: &[usize],
    ) -> Option<PathCandidate> {
        let mut order = waypoints.to_vec();
        order.sort_unstable();

        let mut best: Option<PathCandidate> = None;
        loop {
            if let Some(candidate) = legs.walk(start, &order, goal) {
                let better = best
                    .as_ref()
                    .map_or(true, |current| compare_paths(&candidate, current).is_lt());
                if better {
                    best = Some(candidate);
                }
            }
            if !next_permutation(&mut order) {
                break;
            }
        }
        best
    }
}

/// Repeatedly heads for the closest remaining waypoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourOrderer;

impl WaypointStrategy for NearestNeighbourOrderer {
    fn ordering(&self) -> WaypointOrdering {
        WaypointOrdering::NearestNeighbour
    }

    fn chain(
        &self,
        legs: &mut LegTable<'_>,
        start: usize,
        goal: usize,
        waypoints: &[usize],
    ) -> Option<PathCandidate> {
        let mut remaining = waypoints.to_vec();
        let mut path = PathCandidate::single(start);
        let mut current = start;

        while !remaining.is_empty() {
            let mut closest: Option<(usize, PathCandidate)> = None;
            for (slot, &waypoint) in remaining.iter().enumerate() {
                let Some(leg) = legs.leg(current, waypoint) else {
                    // An unreachable waypoint makes the whole request fail.
                    return None;
                };
                let closer = closest
                    .as_ref()
                    .map_or(true, |(_, best)| compare_paths(&leg, best).is_lt());
                if closer {
                    closest = Some((slot, leg));
                }
            }

            let (slot, leg) = closest?;
            current = remaining.remove(slot);
            path = path.join(&leg);
        }

        let last = legs.leg(current, goal)?;
        Some(path.join(&last))
    }
}

/// Pick the ordering strategy for `count` waypoints.
pub fn select_strategy(count: usize, keep_order: bool) -> Box<dyn WaypointStrategy> {
    if keep_order {
        Box::new(FixedOrderer)
    } else if count <= MAX_EXACT_WAYPOINTS {
        Box::new(ExactOrderer)
    } else {
        warn!(
            waypoints = count,
            limit = MAX_EXACT_WAYPOINTS,
            "too many waypoints for exact ordering; using nearest-neighbour heuristic"
        );
        Box::new(NearestNeighbourOrderer)
    }
}

/// Advance `items` to the next lexicographic permutation.
/// Returns false once the last permutation has been reached.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let Some(successor) = (pivot + 1..items.len())
        .rev()
        .find(|&j| items[j] > items[pivot])
    else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}
