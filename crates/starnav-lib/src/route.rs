use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::catalog::StarId;
use crate::error::{Error, Result};
use crate::geometry::distance;
use crate::graph::NavGraph;

static NEXT_ROUTE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a route across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(u64);

impl RouteId {
    /// Allocate a fresh process-unique identifier.
    pub fn next() -> Self {
        Self(NEXT_ROUTE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route-{}", self.0)
    }
}

/// One star along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Node index in the graph the route was computed on.
    pub index: usize,
    pub id: StarId,
    pub name: String,
    pub coordinates: [f64; 3],
}

/// Ordered sequence of stops with cumulative distance.
///
/// Holds plain values only, so it stays valid after the graph that produced
/// it is rebuilt or dropped. Deserialising goes through
/// [`RouteDescriptor::from_stops`], so an empty stop list is rejected and jump
/// lengths are recomputed from the stop coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRouteDescriptor")]
pub struct RouteDescriptor {
    pub id: RouteId,
    pub name: String,
    pub stops: Vec<RouteStop>,
    /// Length of each jump; one fewer entry than `stops`.
    pub segment_lengths: Vec<f64>,
    /// Sum of `segment_lengths`.
    pub total_distance: f64,
}

/// Wire form of a [`RouteDescriptor`]; the stored lengths are not trusted.
#[derive(Deserialize)]
struct RawRouteDescriptor {
    id: RouteId,
    name: String,
    stops: Vec<RouteStop>,
}

impl TryFrom<RawRouteDescriptor> for RouteDescriptor {
    type Error = Error;

    fn try_from(raw: RawRouteDescriptor) -> Result<Self> {
        Self::from_stops(raw.id, raw.name, raw.stops)
    }
}

impl RouteDescriptor {
    /// Build a descriptor from explicit stops, deriving jump lengths from coordinates.
    pub fn from_stops(id: RouteId, name: impl Into<String>, stops: Vec<RouteStop>) -> Result<Self> {
        if stops.is_empty() {
            return Err(Error::EmptyRoutePlan);
        }

        let segment_lengths: Vec<f64> = stops
            .windows(2)
            .map(|pair| distance(pair[0].coordinates, pair[1].coordinates))
            .collect();
        let total_distance = segment_lengths.iter().sum();

        Ok(Self {
            id,
            name: name.into(),
            stops,
            segment_lengths,
            total_distance,
        })
    }

    /// Build a descriptor for a node-index path on `graph`.
    pub(crate) fn from_path(graph: &NavGraph, path: &[usize]) -> Result<Self> {
        let stops = path
            .iter()
            .filter_map(|&index| graph.node(index))
            .map(|node| RouteStop {
                index: node.index,
                id: node.id.clone(),
                name: node.name.clone(),
                coordinates: node.coordinates,
            })
            .collect::<Vec<_>>();

        let name = match (stops.first(), stops.last()) {
            (Some(start), Some(goal)) => format!("Route {} to {}", start.name, goal.name),
            _ => return Err(Error::EmptyRoutePlan),
        };

        Self::from_stops(RouteId::next(), name, stops)
    }

    /// Number of jumps in the route.
    pub fn hop_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&RouteStop> {
        self.stops.first()
    }

    pub fn goal(&self) -> Option<&RouteStop> {
        self.stops.last()
    }

    /// Star identifiers in travel order.
    pub fn star_ids(&self) -> Vec<&str> {
        self.stops.iter().map(|stop| stop.id.as_str()).collect()
    }

    /// Node indices in travel order.
    pub fn node_indices(&self) -> Vec<usize> {
        self.stops.iter().map(|stop| stop.index).collect()
    }

    /// True when both routes visit the same stars with the same distance,
    /// regardless of identity, name, or the graph indices of the stops.
    pub fn same_course(&self, other: &Self) -> bool {
        self.stops.len() == other.stops.len()
            && self
                .stops
                .iter()
                .zip(&other.stops)
                .all(|(a, b)| a.id == b.id && a.coordinates == b.coordinates)
            && self.segment_lengths == other.segment_lengths
            && self.total_distance == other.total_distance
    }

    /// Rename the route, keeping everything else.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Re-identify the route, keeping everything else.
    pub fn with_id(mut self, id: RouteId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(index: usize, id: &str, coordinates: [f64; 3]) -> RouteStop {
        RouteStop {
            index,
            id: id.to_string(),
            name: id.to_uppercase(),
            coordinates,
        }
    }

    #[test]
    fn empty_stops_are_rejected() {
        let err = RouteDescriptor::from_stops(RouteId::next(), "empty", Vec::new())
            .expect_err("empty route");
        assert_eq!(err, Error::EmptyRoutePlan);
    }

    #[test]
    fn total_is_sum_of_segments() {
        let route = RouteDescriptor::from_stops(
            RouteId::next(),
            "abc",
            vec![
                stop(0, "a", [0.0, 0.0, 0.0]),
                stop(1, "b", [3.0, 0.0, 0.0]),
                stop(2, "c", [3.0, 4.0, 0.0]),
            ],
        )
        .expect("route builds");

        assert_eq!(route.segment_lengths, vec![3.0, 4.0]);
        assert_eq!(route.total_distance, 7.0);
        assert_eq!(route.hop_count(), 2);
        assert_eq!(route.start().map(|stop| stop.id.as_str()), Some("a"));
        assert_eq!(route.goal().map(|stop| stop.id.as_str()), Some("c"));
        assert_eq!(route.star_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn single_stop_has_zero_distance() {
        let route =
            RouteDescriptor::from_stops(RouteId::next(), "solo", vec![stop(0, "a", [1.0, 2.0, 3.0])])
                .expect("route builds");
        assert_eq!(route.total_distance, 0.0);
        assert!(route.segment_lengths.is_empty());
        assert_eq!(route.hop_count(), 0);
    }

    #[test]
    fn same_course_ignores_identity() {
        let stops = vec![stop(0, "a", [0.0, 0.0, 0.0]), stop(1, "b", [1.0, 0.0, 0.0])];
        let first = RouteDescriptor::from_stops(RouteId::next(), "x", stops.clone()).expect("route");
        let second = RouteDescriptor::from_stops(RouteId::next(), "y", stops).expect("route");
        assert_ne!(first.id, second.id);
        assert!(first.same_course(&second));
    }

    #[test]
    fn same_course_ignores_graph_indices() {
        let before = vec![stop(0, "a", [0.0, 0.0, 0.0]), stop(1, "b", [1.0, 0.0, 0.0])];
        let after = vec![stop(7, "a", [0.0, 0.0, 0.0]), stop(3, "b", [1.0, 0.0, 0.0])];
        let first = RouteDescriptor::from_stops(RouteId::next(), "x", before).expect("route");
        let second = RouteDescriptor::from_stops(first.id, "x", after).expect("route");
        assert!(first.same_course(&second));

        let moved = vec![stop(0, "a", [0.0, 0.0, 0.0]), stop(1, "b", [2.0, 0.0, 0.0])];
        let third = RouteDescriptor::from_stops(first.id, "x", moved).expect("route");
        assert!(!first.same_course(&third));
    }

    #[test]
    fn deserialising_empty_route_fails() {
        let json = r#"{"id":1,"name":"x","stops":[],"segment_lengths":[],"total_distance":0.0}"#;
        let err = serde_json::from_str::<RouteDescriptor>(json).expect_err("empty route");
        assert!(err.to_string().contains("route plan was empty"));
    }

    #[test]
    fn deserialising_recomputes_lengths() {
        let json = r#"{
            "id": 4,
            "name": "tampered",
            "stops": [
                {"index": 0, "id": "a", "name": "A", "coordinates": [0.0, 0.0, 0.0]},
                {"index": 1, "id": "b", "name": "B", "coordinates": [3.0, 4.0, 0.0]}
            ],
            "segment_lengths": [1.0],
            "total_distance": 1.0
        }"#;
        let route: RouteDescriptor = serde_json::from_str(json).expect("valid route");
        assert_eq!(route.id, RouteId::from_raw(4));
        assert_eq!(route.segment_lengths, vec![5.0]);
        assert_eq!(route.total_distance, 5.0);

        let round_trip: RouteDescriptor =
            serde_json::from_str(&serde_json::to_string(&route).expect("serialise"))
                .expect("deserialise");
        assert_eq!(round_trip, route);
    }

    #[test]
    fn route_ids_are_unique() {
        let a = RouteId::next();
        let b = RouteId::next();
        assert_ne!(a, b);
        assert_eq!(RouteId::from_raw(a.get()), a);
        assert!(a.to_string().starts_with("route-"));
    }
}
