//! Star records as supplied by the catalog collaborator.
//!
//! The engine never loads or stores catalogs itself; callers hand it a slice of
//! [`StarRecord`] values and may narrow that slice with a [`CatalogFilter`]
//! before building a navigation graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Stable unique identifier for a star record.
pub type StarId = String;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Classification metadata used for filtering and colouring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarMetadata {
    /// Spectral classification, e.g. `G2V` or `M5.5Ve`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral_class: Option<String>,
    /// Political affiliation recorded for the star, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polity: Option<String>,
}

impl StarMetadata {
    /// Leading letter of the spectral class (`G` for `G2V`), upper-cased.
    pub fn spectral_type(&self) -> Option<char> {
        self.spectral_class
            .as_deref()
            .and_then(|class| class.trim().chars().next())
            .map(|c| c.to_ascii_uppercase())
    }
}

/// One star as handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub id: StarId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub metadata: StarMetadata,
}

impl StarRecord {
    pub fn new(id: impl Into<StarId>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            metadata: StarMetadata::default(),
        }
    }

    /// Attach a spectral class to the record.
    pub fn with_spectral_class(mut self, class: impl Into<String>) -> Self {
        self.metadata.spectral_class = Some(class.into());
        self
    }

    /// Attach a polity to the record.
    pub fn with_polity(mut self, polity: impl Into<String>) -> Self {
        self.metadata.polity = Some(polity.into());
        self
    }
}

/// Exclusions applied to a catalog subset before a graph is built.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Spectral type letters (`O`, `B`, `M`, ...) to drop. Matched case-insensitively.
    pub excluded_spectral_classes: HashSet<char>,
    /// Polities to drop. Matched exactly.
    pub excluded_polities: HashSet<String>,
}

impl CatalogFilter {
    /// True when the filter would not remove anything.
    pub fn is_empty(&self) -> bool {
        self.excluded_spectral_classes.is_empty() && self.excluded_polities.is_empty()
    }

    /// Exclude every star of the given spectral type letter.
    pub fn exclude_spectral_class(mut self, class: char) -> Self {
        self.excluded_spectral_classes
            .insert(class.to_ascii_uppercase());
        self
    }

    /// Exclude every star affiliated with `polity`.
    pub fn exclude_polity(mut self, polity: impl Into<String>) -> Self {
        self.excluded_polities.insert(polity.into());
        self
    }

    /// Whether a single record survives the filter.
    pub fn allows(&self, star: &StarRecord) -> bool {
        if let Some(kind) = star.metadata.spectral_type() {
            let excluded = self
                .excluded_spectral_classes
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&kind));
            if excluded {
                return false;
            }
        }

        if let Some(polity) = &star.metadata.polity {
            if self.excluded_polities.contains(polity) {
                return false;
            }
        }

        true
    }

    /// Keep the records that pass the filter, preserving input order.
    pub fn apply(&self, stars: &[StarRecord]) -> Vec<StarRecord> {
        stars
            .iter()
            .filter(|star| self.allows(star))
            .cloned()
            .collect()
    }
}

/// Rank `candidates` by similarity to `query` and return at most `limit` of them.
///
/// Candidates below the similarity threshold are dropped so that wildly
/// different names are never suggested.
pub fn fuzzy_matches<'a, I>(candidates: I, query: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
