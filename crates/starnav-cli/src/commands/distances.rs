//! Distance report command handler.

use std::path::Path;

use anyhow::Result;

use starnav_lib::catalog::fuzzy_matches;
use starnav_lib::{DistanceReport, DistanceToFrom, Error as LibError, StarRecord};

use super::CatalogArgs;
use starnav_cli::output::{print_distances, OutputFormat};

/// Arguments for the distances command.
#[derive(Debug, Clone)]
pub struct DistancesCommandArgs {
    /// Reference star identifier.
    pub star: String,
    /// Show at most this many entries.
    pub limit: Option<usize>,
    /// Drop entries farther than this (light-years).
    pub max_distance: Option<f64>,
    pub catalog: CatalogArgs,
}

/// Handle the distances subcommand.
pub fn handle_distances_command(
    catalog_path: &Path,
    format: OutputFormat,
    args: &DistancesCommandArgs,
) -> Result<()> {
    let stars = args.catalog.load(catalog_path)?;
    let reference = find_star(&stars, &args.star)?;
    let report = DistanceReport::for_star(reference, &stars);

    let entries = select_entries(&report, args.limit, args.max_distance);
    print_distances(&report, &entries, format)
}

fn find_star<'a>(stars: &'a [StarRecord], id: &str) -> Result<&'a StarRecord, LibError> {
    stars
        .iter()
        .find(|star| star.id == id)
        .ok_or_else(|| LibError::UnknownNode {
            id: id.to_string(),
            suggestions: fuzzy_matches(
                stars
                    .iter()
                    .flat_map(|star| [star.id.as_str(), star.name.as_str()]),
                id,
                3,
            ),
        })
}

/// Closest-first entries after applying the distance cap and the limit.
fn select_entries(
    report: &DistanceReport,
    limit: Option<usize>,
    max_distance: Option<f64>,
) -> Vec<DistanceToFrom> {
    let mut entries = match max_distance {
        Some(max) => report.within(max),
        None => report.get_distance_list(),
    };
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use starnav_lib::Position;

    fn stars() -> Vec<StarRecord> {
        [("sol", 0.0), ("far", 9.0), ("near", 1.0), ("mid", 4.0)]
            .into_iter()
            .map(|(id, x)| StarRecord::new(id, id, Position::new(x, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn limit_and_cap_combine() {
        let stars = stars();
        let report = DistanceReport::for_star(&stars[0], &stars);
        let ids = |entries: Vec<DistanceToFrom>| -> Vec<String> {
            entries.into_iter().map(|entry| entry.to_id).collect()
        };

        assert_eq!(ids(select_entries(&report, None, None)), vec!["near", "mid", "far"]);
        assert_eq!(ids(select_entries(&report, Some(1), None)), vec!["near"]);
        assert_eq!(ids(select_entries(&report, None, Some(5.0))), vec!["near", "mid"]);
    }

    #[test]
    fn unknown_reference_suggests() {
        let err = find_star(&stars(), "nearr").expect_err("unknown");
        match err {
            LibError::UnknownNode { suggestions, .. } => {
                assert!(suggestions.contains(&"near".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
