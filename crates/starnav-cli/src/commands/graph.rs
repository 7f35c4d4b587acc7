//! Graph statistics command handler.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use starnav_lib::{EdgeDiscovery, NavGraph};

use super::{build_graph, CatalogArgs};
use starnav_cli::output::OutputFormat;

/// Arguments for the graph command.
#[derive(Debug, Clone)]
pub struct GraphCommandArgs {
    /// Edge threshold (light-years).
    pub max_jump: f64,
    pub catalog: CatalogArgs,
    pub max_stars: usize,
}

/// Counts describing a built graph.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub degenerate_edges: usize,
    pub isolated_nodes: usize,
    pub max_distance: f64,
    pub discovery: EdgeDiscovery,
}

impl GraphStats {
    pub fn from_graph(graph: &NavGraph, max_distance: f64) -> Self {
        Self {
            nodes: graph.len(),
            edges: graph.edges().len(),
            degenerate_edges: graph.degenerate_edges().count(),
            isolated_nodes: (0..graph.len())
                .filter(|&index| graph.neighbours(index).is_empty())
                .count(),
            max_distance,
            discovery: graph.discovery(),
        }
    }
}

/// Handle the graph subcommand.
pub fn handle_graph_command(
    catalog_path: &Path,
    format: OutputFormat,
    args: &GraphCommandArgs,
) -> Result<()> {
    let stars = args.catalog.load(catalog_path)?;
    let graph = build_graph(&stars, args.max_jump, args.max_stars)?;
    let stats = GraphStats::from_graph(&graph, args.max_jump);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut out, &stats).context("failed to serialise output")?;
        writeln!(out)?;
    } else {
        writeln!(out, "Nodes: {}", stats.nodes)?;
        writeln!(out, "Edges: {}", stats.edges)?;
        writeln!(out, "Degenerate edges: {}", stats.degenerate_edges)?;
        writeln!(out, "Isolated stars: {}", stats.isolated_nodes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use starnav_lib::{Position, StarRecord};

    #[test]
    fn stats_count_isolated_and_degenerate() {
        let stars = vec![
            StarRecord::new("a", "A", Position::new(0.0, 0.0, 0.0)),
            StarRecord::new("b", "B", Position::new(0.0, 0.0, 0.0)),
            StarRecord::new("c", "C", Position::new(50.0, 0.0, 0.0)),
        ];
        let graph = build_graph(&stars, 5.0, 10).expect("graph builds");
        let stats = GraphStats::from_graph(&graph, 5.0);
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.degenerate_edges, 1);
        assert_eq!(stats.isolated_nodes, 1);
    }
}
