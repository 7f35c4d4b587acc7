use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::distance;
use crate::graph::NavGraph;
use crate::route::{RouteDescriptor, RouteId, RouteStop};

/// A route assembled one star at a time.
///
/// Jumps are not restricted to graph edges; any two known stars can be
/// linked. The route keeps one [`RouteId`] across edits so republishing it
/// to a [`crate::RouteBook`] reports an update rather than a new route.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualRoute {
    id: RouteId,
    name: Option<String>,
    stops: Vec<RouteStop>,
}

impl ManualRoute {
    /// Begin a new route at `start_id`.
    pub fn start(graph: &NavGraph, start_id: &str) -> Result<Self> {
        let stop = stop_for(graph, start_id)?;
        Ok(Self {
            id: RouteId::next(),
            name: None,
            stops: vec![stop],
        })
    }

    /// Resume editing a finished route, keeping its identity and name.
    pub fn edit(route: RouteDescriptor) -> Self {
        Self {
            id: route.id,
            name: Some(route.name),
            stops: route.stops,
        }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Append `id` to the route and return the length of the new jump.
    ///
    /// Fails if `id` is unknown or is already the last stop.
    pub fn push(&mut self, graph: &NavGraph, id: &str) -> Result<f64> {
        let stop = stop_for(graph, id)?;
        let tail = self.stops.last().ok_or(Error::EmptyRoutePlan)?;
        if tail.id == stop.id {
            return Err(Error::InvalidParameter {
                name: "id",
                message: format!("{id} is already the last stop"),
            });
        }

        let jump = distance(tail.coordinates, stop.coordinates);
        debug!(route = %self.id, star = id, jump, "added stop to manual route");
        self.stops.push(stop);
        Ok(jump)
    }

    /// Drop the last stop. The starting star is never removed.
    pub fn pop(&mut self) -> Option<RouteStop> {
        if self.stops.len() > 1 {
            self.stops.pop()
        } else {
            None
        }
    }

    /// Cumulative distance so far.
    pub fn total_distance(&self) -> f64 {
        self.stops
            .windows(2)
            .map(|pair| distance(pair[0].coordinates, pair[1].coordinates))
            .sum()
    }

    /// Snapshot the route as a descriptor.
    pub fn finish(&self) -> Result<RouteDescriptor> {
        let name = match (&self.name, self.stops.first(), self.stops.last()) {
            (Some(name), _, _) => name.clone(),
            (None, Some(start), Some(goal)) => format!("Route {} to {}", start.name, goal.name),
            _ => return Err(Error::EmptyRoutePlan),
        };
        RouteDescriptor::from_stops(self.id, name, self.stops.clone())
    }
}

fn stop_for(graph: &NavGraph, id: &str) -> Result<RouteStop> {
    let index = graph.resolve(id)?;
    let node = graph.node(index).ok_or_else(|| Error::UnknownNode {
        id: id.to_string(),
        suggestions: Vec::new(),
    })?;
    Ok(RouteStop {
        index: node.index,
        id: node.id.clone(),
        name: node.name.clone(),
        coordinates: node.coordinates,
    })
}
