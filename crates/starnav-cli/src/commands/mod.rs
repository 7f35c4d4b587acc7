// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments and dispatches
// to these handlers.

pub mod distances;
pub mod graph;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};

use starnav_lib::{CatalogFilter, GraphBuildOptions, NavGraph, StarRecord};
use starnav_cli::catalog::load_catalog;

/// Catalog options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Spectral type letters to drop before building.
    pub exclude_classes: Vec<char>,
    /// Polities to drop before building.
    pub exclude_polities: Vec<String>,
}

impl CatalogArgs {
    fn filter(&self) -> CatalogFilter {
        let filter = self
            .exclude_classes
            .iter()
            .fold(CatalogFilter::default(), |filter, class| {
                filter.exclude_spectral_class(*class)
            });
        self.exclude_polities
            .iter()
            .fold(filter, |filter, polity| filter.exclude_polity(polity.clone()))
    }

    /// Load the catalog and apply the exclusions.
    pub fn load(&self, path: &Path) -> Result<Vec<StarRecord>> {
        let stars = load_catalog(path)?;
        let filter = self.filter();
        if filter.is_empty() {
            return Ok(stars);
        }

        let kept = filter.apply(&stars);
        tracing::debug!(
            loaded = stars.len(),
            kept = kept.len(),
            "applied catalog exclusions"
        );
        Ok(kept)
    }
}

/// Build a graph connecting every pair within `range`.
pub fn build_graph(stars: &[StarRecord], range: f64, max_stars: usize) -> Result<NavGraph> {
    let options = GraphBuildOptions {
        max_stars,
        ..GraphBuildOptions::default()
    };
    let mut graph =
        NavGraph::build_with_options(stars, options).context("failed to build navigation graph")?;
    graph
        .connect_within(range)
        .context("failed to connect navigation graph")?;
    Ok(graph)
}
