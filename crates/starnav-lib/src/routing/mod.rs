//! Route search over a built [`NavGraph`].
//!
//! This module provides:
//! - [`RouteConstraints`] - search-time jump limits, waypoints and avoid-list
//! - [`find_route`] - the single best route between two stars
//! - [`find_routes`] - up to `k` ranked alternatives
//!
//! Routes are ranked by total distance, then by hop count, then by the
//! lexicographically smaller node-index sequence, so repeated searches over
//! the same graph always return the same answer.
//!
//! # Waypoints
//!
//! Required waypoints are chained leg by leg. Up to [`MAX_EXACT_WAYPOINTS`]
//! waypoints are ordered optimally by trying every permutation; beyond that a
//! nearest-neighbour heuristic is used, which may return a longer route than
//! the optimum. See [`waypoints`] for the strategies.
//!
//! # Example
//!
//! ```
//! use starnav_lib::{find_route, NavGraph, Position, RouteConstraints, StarRecord};
//!
//! let stars = vec![
//!     StarRecord::new("sol", "Sol", Position::new(0.0, 0.0, 0.0)),
//!     StarRecord::new("acen", "Alpha Centauri", Position::new(4.37, 0.0, 0.0)),
//! ];
//! let graph = NavGraph::connected(&stars, 5.0)?;
//! let route = find_route(&graph, "sol", "acen", &RouteConstraints::default())?;
//! assert_eq!(route.hop_count(), 1);
//! # Ok::<(), starnav_lib::Error>(())
//! ```

pub mod waypoints;

pub use waypoints::{
    select_strategy, ExactOrderer, FixedOrderer, LegTable, NearestNeighbourOrderer,
    WaypointOrdering, WaypointStrategy, MAX_EXACT_WAYPOINTS,
};

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::catalog::StarId;
use crate::error::{check_distance, Error, Result};
use crate::graph::NavGraph;
use crate::path::{k_shortest_paths, shortest_path, PathCandidate, SearchMask};
use crate::route::RouteDescriptor;

/// Constraints applied at search time, independent of how the graph was built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteConstraints {
    /// Longest single jump the route may take.
    pub max_jump_distance: Option<f64>,
    /// Jumps must be strictly longer than this.
    pub min_jump_distance: Option<f64>,
    /// Stars the route must pass through. Duplicates are ignored.
    pub must_visit: Vec<StarId>,
    /// Visit `must_visit` in the listed order instead of the cheapest order.
    pub keep_waypoint_order: bool,
    /// Stars excluded entirely.
    pub avoid: BTreeSet<StarId>,
}

impl RouteConstraints {
    pub fn with_max_jump(mut self, limit: f64) -> Self {
        self.max_jump_distance = Some(limit);
        self
    }

    pub fn with_min_jump(mut self, limit: f64) -> Self {
        self.min_jump_distance = Some(limit);
        self
    }

    /// Require the route to pass through `id`.
    pub fn visiting(mut self, id: impl Into<StarId>) -> Self {
        self.must_visit.push(id.into());
        self
    }

    /// Exclude `id` from the route.
    pub fn avoiding(mut self, id: impl Into<StarId>) -> Self {
        self.avoid.insert(id.into());
        self
    }

    /// Visit waypoints in the order they were added.
    pub fn in_order(mut self) -> Self {
        self.keep_waypoint_order = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_jump_distance {
            check_distance("max_jump_distance", limit)?;
        }
        if let Some(limit) = self.min_jump_distance {
            check_distance("min_jump_distance", limit)?;
        }
        Ok(())
    }

    fn to_mask(&self, graph: &NavGraph, avoided: &[usize]) -> SearchMask {
        let mut mask = SearchMask::new(graph)
            .with_max_jump(self.max_jump_distance)
            .with_min_jump(self.min_jump_distance);
        for &node in avoided {
            mask.block_node(node);
        }
        mask
    }
}

/// Request endpoints resolved against one graph.
struct ResolvedRequest {
    start: usize,
    goal: usize,
    waypoints: Vec<usize>,
    avoided: Vec<usize>,
}

fn resolve_request(
    graph: &NavGraph,
    start_id: &str,
    goal_id: &str,
    constraints: &RouteConstraints,
) -> Result<ResolvedRequest> {
    constraints.validate()?;

    let start = graph.resolve(start_id)?;
    let goal = graph.resolve(goal_id)?;

    let mut waypoints = Vec::new();
    for id in &constraints.must_visit {
        let index = graph.resolve(id)?;
        if index != start && index != goal && !waypoints.contains(&index) {
            waypoints.push(index);
        }
    }

    let mut avoided = Vec::new();
    for id in &constraints.avoid {
        match graph.index_of(id) {
            Some(index) => avoided.push(index),
            None => debug!(star = %id, "avoided star is not in the graph; ignoring"),
        }
    }

    Ok(ResolvedRequest {
        start,
        goal,
        waypoints,
        avoided,
    })
}

fn no_route(start_id: &str, goal_id: &str) -> Error {
    Error::NoRoute {
        start: start_id.to_string(),
        goal: goal_id.to_string(),
    }
}

/// Find the best route from `start_id` to `goal_id`.
///
/// # Errors
///
/// - [`Error::UnknownNode`] if an endpoint or waypoint is not in the graph.
/// - [`Error::NoRoute`] if nothing connects the endpoints under `constraints`.
/// - [`Error::InvalidParameter`] for negative or NaN jump limits.
pub fn find_route(
    graph: &NavGraph,
    start_id: &str,
    goal_id: &str,
    constraints: &RouteConstraints,
) -> Result<RouteDescriptor> {
    let request = resolve_request(graph, start_id, goal_id, constraints)?;

    if request.start == request.goal && request.waypoints.is_empty() {
        return RouteDescriptor::from_path(graph, &[request.start]);
    }

    let blocked = |node: &usize| request.avoided.contains(node);
    if blocked(&request.start) || blocked(&request.goal) || request.waypoints.iter().any(blocked)
    {
        debug!(
            start = start_id,
            goal = goal_id,
            "endpoint or waypoint is on the avoid list"
        );
        return Err(no_route(start_id, goal_id));
    }

    let mask = constraints.to_mask(graph, &request.avoided);
    let path = if request.waypoints.is_empty() {
        shortest_path(graph, request.start, request.goal, &mask)
    } else {
        let strategy = select_strategy(request.waypoints.len(), constraints.keep_waypoint_order);
        debug!(
            waypoints = request.waypoints.len(),
            ordering = ?strategy.ordering(),
            "chaining route through waypoints"
        );
        let mut legs = LegTable::new(graph, &mask);
        strategy.chain(&mut legs, request.start, request.goal, &request.waypoints)
    };

    let path = path.ok_or_else(|| no_route(start_id, goal_id))?;
    let route = RouteDescriptor::from_path(graph, &path.nodes)?;

    info!(
        start = start_id,
        goal = goal_id,
        hops = route.hop_count(),
        distance = route.total_distance,
        "route found"
    );

    Ok(route)
}

/// Find up to `k` alternative routes, best first.
///
/// The first entry always equals [`find_route`]'s result. Waypoints are not
/// supported here.
pub fn find_routes(
    graph: &NavGraph,
    start_id: &str,
    goal_id: &str,
    constraints: &RouteConstraints,
    k: usize,
) -> Result<Vec<RouteDescriptor>> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "at least one route must be requested".to_string(),
        });
    }
    if !constraints.must_visit.is_empty() {
        return Err(Error::UnsupportedRouteOption {
            option: "must_visit".to_string(),
        });
    }

    let request = resolve_request(graph, start_id, goal_id, constraints)?;
    if request.start == request.goal {
        return Ok(vec![RouteDescriptor::from_path(graph, &[request.start])?]);
    }

    let mask = constraints.to_mask(graph, &request.avoided);
    let paths: Vec<PathCandidate> = k_shortest_paths(graph, request.start, request.goal, &mask, k);
    if paths.is_empty() {
        return Err(no_route(start_id, goal_id));
    }

    let routes = paths
        .iter()
        .enumerate()
        .map(|(rank, path)| {
            RouteDescriptor::from_path(graph, &path.nodes)
                .map(|route| {
                    let name = format!("{} (#{})", route.name, rank + 1);
                    route.with_name(name)
                })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        start = start_id,
        goal = goal_id,
        requested = k,
        found = routes.len(),
        "ranked routes found"
    );

    Ok(routes)
}
