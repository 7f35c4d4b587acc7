//! Starnav library entry points.
//!
//! This crate turns a catalog of stars with 3-D coordinates into a navigation
//! graph, searches it for routes under jump-distance, waypoint and avoid-list
//! constraints, and ranks distances from a reference star. Presentation layers
//! (the CLI, viewers subscribed through [`RouteListener`]) should depend on the
//! items exported here instead of reimplementing behavior.
//!
//! The engine performs no I/O; star records are supplied by the caller.

#![deny(warnings)]

pub mod cache;
pub mod catalog;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod manual;
pub mod notify;
pub mod output;
pub mod path;
pub mod report;
pub mod route;
pub mod routing;
pub mod spatial;

pub use cache::{CacheStats, RouteCache, RouteCacheKey, DEFAULT_CACHE_CAPACITY};
pub use catalog::{CatalogFilter, StarId, StarMetadata, StarRecord};
pub use error::{Error, Result};
pub use geometry::{distance, Position};
pub use graph::{
    EdgeDiscovery, GraphBuildOptions, NavEdge, NavGraph, NavNode, SharedGraph,
    DEFAULT_GRAPH_STAR_LIMIT, DEFAULT_SPATIAL_INDEX_THRESHOLD,
};
pub use manual::ManualRoute;
pub use notify::{RouteBook, RouteChange, RouteListener};
pub use output::{
    render_distance_report, RouteEndpoint, RouteOutputKind, RouteRenderMode, RouteStep,
    RouteSummary,
};
pub use report::{DistanceReport, DistanceToFrom};
pub use route::{RouteDescriptor, RouteId, RouteStop};
pub use routing::{find_route, find_routes, RouteConstraints, MAX_EXACT_WAYPOINTS};
