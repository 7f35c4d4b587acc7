//! Route command handler for computing paths between stars.

use std::path::Path;

use anyhow::Result;

use starnav_lib::{
    find_route, find_routes, RouteConstraints, RouteDescriptor, RouteOutputKind, RouteSummary,
};

use super::{build_graph, CatalogArgs};
use starnav_cli::output::{print_routes, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting star identifier.
    pub from: String,
    /// Destination star identifier.
    pub to: String,
    /// Longest single jump (light-years).
    pub max_jump: Option<f64>,
    /// Jumps must be longer than this (light-years).
    pub min_jump: Option<f64>,
    /// Stars the route must pass through.
    pub via: Vec<String>,
    /// Visit `via` stars in the order given.
    pub in_order: bool,
    /// Stars to avoid.
    pub avoid: Vec<String>,
    /// Number of ranked alternatives to show.
    pub paths: usize,
    pub catalog: CatalogArgs,
    pub max_stars: usize,
}

impl RouteCommandArgs {
    /// Convert CLI args to library search constraints.
    pub fn to_constraints(&self) -> RouteConstraints {
        RouteConstraints {
            max_jump_distance: self.max_jump,
            min_jump_distance: self.min_jump,
            must_visit: self.via.clone(),
            keep_waypoint_order: self.in_order,
            avoid: self.avoid.iter().cloned().collect(),
        }
    }

    /// Edge threshold for the graph; unbounded when no jump limit is given.
    pub fn graph_range(&self) -> f64 {
        self.max_jump.unwrap_or(f64::INFINITY)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    catalog_path: &Path,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let stars = args.catalog.load(catalog_path)?;
    let graph = build_graph(&stars, args.graph_range(), args.max_stars)?;
    let constraints = args.to_constraints();

    let routes: Vec<RouteDescriptor> = if args.paths > 1 {
        find_routes(&graph, &args.from, &args.to, &constraints, args.paths)?
    } else {
        vec![find_route(&graph, &args.from, &args.to, &constraints)?]
    };

    let kind = if routes.len() > 1 {
        RouteOutputKind::Alternative
    } else {
        RouteOutputKind::Route
    };
    let summaries = routes
        .iter()
        .map(|route| RouteSummary::from_route(kind, route))
        .collect::<starnav_lib::Result<Vec<_>>>()?;

    print_routes(&summaries, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RouteCommandArgs {
        RouteCommandArgs {
            from: "a".into(),
            to: "b".into(),
            max_jump: None,
            min_jump: Some(1.0),
            via: vec!["c".into()],
            in_order: true,
            avoid: vec!["d".into(), "d".into()],
            paths: 1,
            catalog: CatalogArgs::default(),
            max_stars: 10,
        }
    }

    #[test]
    fn constraints_mirror_arguments() {
        let constraints = args().to_constraints();
        assert_eq!(constraints.min_jump_distance, Some(1.0));
        assert_eq!(constraints.must_visit, vec!["c".to_string()]);
        assert!(constraints.keep_waypoint_order);
        assert_eq!(constraints.avoid.len(), 1);
    }

    #[test]
    fn missing_max_jump_connects_everything() {
        assert!(args().graph_range().is_infinite());
        let limited = RouteCommandArgs {
            max_jump: Some(8.0),
            ..args()
        };
        assert_eq!(limited.graph_range(), 8.0);
    }
}
