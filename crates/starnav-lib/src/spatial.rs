//! KD-tree spatial index used to prune candidate star pairs.
//!
//! Edge discovery for large catalogs would otherwise compare every pair of
//! stars. The index narrows each star's candidates to those inside a query
//! sphere; callers still apply the exact distance test to every candidate, so
//! the resulting edge set is identical to brute force.
//!
//! # Limitations
//!
//! The underlying `kiddo` tree cannot split a bucket whose items all share one
//! value on the split axis. [`SpatialIndex::build`] therefore declines to index
//! point sets where more than [`BUCKET_SIZE`] points share a coordinate value on
//! any axis, or where any coordinate is not finite. Callers fall back to a
//! pairwise scan in that case.

use std::collections::HashMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

/// KD-tree bucket size (kiddo default).
pub const BUCKET_SIZE: usize = 32;

/// Relative slack added to query radii so boundary points are never missed.
const RADIUS_SLACK: f64 = 1e-9;

/// Precomputed spatial index over a dense list of points.
///
/// Items are positions in the slice the index was built from.
pub struct SpatialIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    len: usize,
}

impl SpatialIndex {
    /// Build an index over `points`, or `None` when the point set cannot be
    /// indexed safely (see the module docs).
    pub fn build(points: &[[f64; 3]]) -> Option<Self> {
        if !is_indexable(points) {
            debug!(
                point_count = points.len(),
                "point set not indexable; falling back to pairwise scan"
            );
            return None;
        }

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, point) in points.iter().enumerate() {
            tree.add(point, index);
        }

        debug!(point_count = points.len(), "built spatial index");

        Some(Self {
            tree,
            len: points.len(),
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Candidate items within roughly `radius` of `point`.
    ///
    /// The search sphere is widened by a tiny relative slack, so the result is
    /// a superset of the exact answer. Items are returned in ascending order.
    pub fn candidates_within(&self, point: [f64; 3], radius: f64) -> Vec<usize> {
        if self.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let padded = radius * (1.0 + RADIUS_SLACK) + RADIUS_SLACK;
        let mut items: Vec<usize> = self
            .tree
            .within::<SquaredEuclidean>(&point, padded * padded)
            .into_iter()
            .map(|neighbour| neighbour.item)
            .collect();
        items.sort_unstable();
        items
    }
}

/// Whether `points` can be loaded into the KD-tree without overflowing a bucket.
pub fn is_indexable(points: &[[f64; 3]]) -> bool {
    if points
        .iter()
        .any(|point| point.iter().any(|value| !value.is_finite()))
    {
        return false;
    }

    (0..3).all(|axis| {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        for point in points {
            // Normalise -0.0 so it shares a bucket count with 0.0.
            let value = if point[axis] == 0.0 { 0.0 } else { point[axis] };
            let count = counts.entry(value.to_bits()).or_default();
            *count += 1;
            if *count > BUCKET_SIZE {
                return false;
            }
        }
        true
    })
}
