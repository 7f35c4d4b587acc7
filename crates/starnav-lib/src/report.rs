//! Distance rankings relative to one reference star.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{StarId, StarRecord};
use crate::error::{check_distance, Result};

/// Distance from a fixed reference star to one other star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceToFrom {
    pub from_id: StarId,
    pub from_name: String,
    pub to_id: StarId,
    pub to_name: String,
    pub distance: f64,
}

impl DistanceToFrom {
    /// Record an externally computed distance.
    ///
    /// Fails with [`crate::Error::InvalidParameter`] for negative or NaN values.
    pub fn new(from: &StarRecord, to: &StarRecord, distance: f64) -> Result<Self> {
        check_distance("distance", distance)?;
        Ok(Self {
            from_id: from.id.clone(),
            from_name: from.name.clone(),
            to_id: to.id.clone(),
            to_name: to.name.clone(),
            distance,
        })
    }

    /// Measure the distance between two catalog stars.
    pub fn between(from: &StarRecord, to: &StarRecord) -> Self {
        Self {
            from_id: from.id.clone(),
            from_name: from.name.clone(),
            to_id: to.id.clone(),
            to_name: to.name.clone(),
            distance: from.position.distance_to(&to.position),
        }
    }
}

impl fmt::Display for DistanceToFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Distance from {} to {} is {:.2} ly",
            self.from_name, self.to_name, self.distance
        )
    }
}

/// Growing list of distances from one reference star.
///
/// Entries are kept in insertion order; [`DistanceReport::get_distance_list`]
/// sorts a copy on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    reference: Option<StarId>,
    entries: Vec<DistanceToFrom>,
}

impl DistanceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report measuring from `reference` to every other star in `stars`.
    pub fn for_star(reference: &StarRecord, stars: &[StarRecord]) -> Self {
        let mut report = Self {
            reference: Some(reference.id.clone()),
            entries: Vec::with_capacity(stars.len()),
        };
        for star in stars.iter().filter(|star| star.id != reference.id) {
            report.add(DistanceToFrom::between(reference, star));
        }
        report
    }

    /// Reference star identifier, if the report was built with [`Self::for_star`].
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Append an entry. Duplicates are kept.
    pub fn add(&mut self, entry: DistanceToFrom) {
        self.entries.push(entry);
    }

    /// Entries in ascending distance; equal distances keep insertion order.
    pub fn get_distance_list(&self) -> Vec<DistanceToFrom> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        sorted
    }

    /// The `limit` closest entries.
    pub fn nearest(&self, limit: usize) -> Vec<DistanceToFrom> {
        let mut sorted = self.get_distance_list();
        sorted.truncate(limit);
        sorted
    }

    /// Entries no farther than `max_distance`, closest first.
    pub fn within(&self, max_distance: f64) -> Vec<DistanceToFrom> {
        self.get_distance_list()
            .into_iter()
            .filter(|entry| entry.distance <= max_distance)
            .collect()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[DistanceToFrom] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
