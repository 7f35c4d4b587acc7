use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{fuzzy_matches, StarId, StarRecord};
use crate::error::{check_distance, Error, Result};
use crate::geometry::distance;
use crate::spatial::SpatialIndex;

/// Largest catalog subset a graph will be built from by default.
pub const DEFAULT_GRAPH_STAR_LIMIT: usize = 1500;

/// Catalog size above which edge discovery goes through the KD-tree.
/// Smaller subsets are cheaper to scan pairwise.
pub const DEFAULT_SPATIAL_INDEX_THRESHOLD: usize = 100;

/// Knobs applied when building a [`NavGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBuildOptions {
    /// Reject catalog subsets with more stars than this.
    pub max_stars: usize,
    /// Use the spatial index for edge discovery once the node count exceeds this.
    pub spatial_index_threshold: usize,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            max_stars: DEFAULT_GRAPH_STAR_LIMIT,
            spatial_index_threshold: DEFAULT_SPATIAL_INDEX_THRESHOLD,
        }
    }
}

/// How the current edge set was discovered. Never affects which edges exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDiscovery {
    /// No `connect_within` call has been made yet.
    None,
    /// Every pair of nodes was compared.
    Pairwise,
    /// Candidates were pruned with the KD-tree before the exact test.
    SpatialIndex,
}

/// Graph vertex representing one star.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNode {
    /// Dense zero-based position in the graph's node list.
    pub index: usize,
    pub id: StarId,
    pub name: String,
    pub coordinates: [f64; 3],
}

/// Undirected edge between two nodes, weighted by Euclidean distance.
///
/// `first` is always the lower node index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavEdge {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

impl NavEdge {
    /// Zero-length edge between distinct stars sharing one position.
    pub fn is_degenerate(&self) -> bool {
        self.distance == 0.0
    }

    /// The endpoint opposite `node`.
    pub fn other(&self, node: usize) -> usize {
        if node == self.first {
            self.second
        } else {
            self.first
        }
    }

    /// Whether this edge joins `a` and `b` in either order.
    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Entry in a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// Index of the neighbouring node.
    pub node: usize,
    /// Index of the connecting edge in [`NavGraph::edges`].
    pub edge: usize,
}

/// Navigation graph over a catalog subset.
///
/// Nodes live in a dense arena; edges and adjacency refer to them by index.
/// The edge set only changes wholesale through [`NavGraph::connect_within`] or
/// [`NavGraph::rebuild`].
#[derive(Debug, Clone)]
pub struct NavGraph {
    nodes: Vec<NavNode>,
    id_to_index: HashMap<StarId, usize>,
    edges: Vec<NavEdge>,
    adjacency: Vec<Vec<Adjacent>>,
    max_distance: Option<f64>,
    discovery: EdgeDiscovery,
    options: GraphBuildOptions,
}

impl NavGraph {
    /// Build an edgeless graph with default options.
    pub fn build(stars: &[StarRecord]) -> Result<Self> {
        Self::build_with_options(stars, GraphBuildOptions::default())
    }

    /// Build an edgeless graph, assigning indices in input order.
    pub fn build_with_options(stars: &[StarRecord], options: GraphBuildOptions) -> Result<Self> {
        if stars.len() > options.max_stars {
            return Err(Error::TooManyStars {
                count: stars.len(),
                limit: options.max_stars,
            });
        }

        let mut nodes = Vec::with_capacity(stars.len());
        let mut id_to_index = HashMap::with_capacity(stars.len());

        for (index, star) in stars.iter().enumerate() {
            match id_to_index.entry(star.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateNode {
                        id: star.id.clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
            nodes.push(NavNode {
                index,
                id: star.id.clone(),
                name: star.name.clone(),
                coordinates: star.position.coords(),
            });
        }

        debug!(node_count = nodes.len(), "built navigation graph nodes");

        Ok(Self {
            adjacency: vec![Vec::new(); nodes.len()],
            nodes,
            id_to_index,
            edges: Vec::new(),
            max_distance: None,
            discovery: EdgeDiscovery::None,
            options,
        })
    }

    /// Build a graph and connect every pair within `max_distance`.
    pub fn connected(stars: &[StarRecord], max_distance: f64) -> Result<Self> {
        let mut graph = Self::build(stars)?;
        graph.connect_within(max_distance)?;
        Ok(graph)
    }

    /// Replace the edge set with one edge per unordered pair whose distance
    /// is at most `max_distance`.
    ///
    /// The previous edge set is kept if `max_distance` is rejected.
    pub fn connect_within(&mut self, max_distance: f64) -> Result<()> {
        check_distance("max_distance", max_distance)?;

        let points: Vec<[f64; 3]> = self.nodes.iter().map(|node| node.coordinates).collect();
        let index = if points.len() > self.options.spatial_index_threshold
            && max_distance.is_finite()
        {
            SpatialIndex::build(&points)
        } else {
            None
        };

        let (edges, discovery) = match index {
            Some(index) => (
                edges_from_index(&points, &index, max_distance),
                EdgeDiscovery::SpatialIndex,
            ),
            None => (edges_pairwise(&points, max_distance), EdgeDiscovery::Pairwise),
        };

        let mut adjacency = vec![Vec::new(); points.len()];
        for (edge_index, edge) in edges.iter().enumerate() {
            adjacency[edge.first].push(Adjacent {
                node: edge.second,
                edge: edge_index,
            });
            adjacency[edge.second].push(Adjacent {
                node: edge.first,
                edge: edge_index,
            });
        }
        for list in &mut adjacency {
            list.sort_by_key(|adjacent| adjacent.node);
        }

        let degenerate = edges.iter().filter(|edge| edge.is_degenerate()).count();
        if degenerate > 0 {
            warn!(
                degenerate_edges = degenerate,
                "stars share identical coordinates; zero-length edges are never traversed"
            );
        }

        info!(
            node_count = points.len(),
            edge_count = edges.len(),
            max_distance,
            discovery = ?discovery,
            "connected navigation graph"
        );

        self.edges = edges;
        self.adjacency = adjacency;
        self.max_distance = Some(max_distance);
        self.discovery = discovery;
        Ok(())
    }

    /// Rebuild from a new catalog subset, keeping this graph's build options.
    ///
    /// On error the existing graph is left untouched.
    pub fn rebuild(&mut self, stars: &[StarRecord], max_distance: Option<f64>) -> Result<()> {
        let mut fresh = Self::build_with_options(stars, self.options)?;
        if let Some(limit) = max_distance {
            fresh.connect_within(limit)?;
        }
        *self = fresh;
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&NavNode> {
        self.nodes.get(index)
    }

    /// Look up a node by star identifier.
    pub fn node_by_id(&self, id: &str) -> Option<&NavNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// Dense index for a star identifier.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn edges(&self) -> &[NavEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&NavEdge> {
        self.edges.get(index)
    }

    /// Edges whose endpoints share identical coordinates.
    pub fn degenerate_edges(&self) -> impl Iterator<Item = &NavEdge> {
        self.edges.iter().filter(|edge| edge.is_degenerate())
    }

    /// Neighbours of a node, ordered by neighbour index.
    pub fn neighbours(&self, index: usize) -> &[Adjacent] {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Threshold used by the last `connect_within`, if any.
    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    pub fn discovery(&self) -> EdgeDiscovery {
        self.discovery
    }

    pub fn options(&self) -> GraphBuildOptions {
        self.options
    }

    /// Resolve an identifier or fail with suggestions drawn from ids and names.
    pub fn resolve(&self, id: &str) -> Result<usize> {
        self.index_of(id).ok_or_else(|| Error::UnknownNode {
            id: id.to_string(),
            suggestions: self.suggestions(id, 3),
        })
    }

    /// Identifiers or names that resemble `query`.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<String> {
        let candidates = self
            .nodes
            .iter()
            .flat_map(|node| [node.id.as_str(), node.name.as_str()]);
        fuzzy_matches(candidates, query, limit)
    }

    /// Hash of node identities, names, coordinates, and threshold.
    ///
    /// Two graphs with equal fingerprints produce the same search results.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for node in &self.nodes {
            node.id.hash(&mut hasher);
            node.name.hash(&mut hasher);
            for value in node.coordinates {
                value.to_bits().hash(&mut hasher);
            }
        }
        self.max_distance.map(f64::to_bits).hash(&mut hasher);
        hasher.finish()
    }
}

fn edges_pairwise(points: &[[f64; 3]], max_distance: f64) -> Vec<NavEdge> {
    let mut edges = Vec::new();
    for first in 0..points.len() {
        for second in (first + 1)..points.len() {
            let d = distance(points[first], points[second]);
            if d <= max_distance {
                edges.push(NavEdge {
                    first,
                    second,
                    distance: d,
                });
            }
        }
    }
    edges
}

fn edges_from_index(points: &[[f64; 3]], index: &SpatialIndex, max_distance: f64) -> Vec<NavEdge> {
    let mut edges = Vec::new();
    for (first, point) in points.iter().enumerate() {
        for second in index.candidates_within(*point, max_distance) {
            if second <= first {
                continue;
            }
            let d = distance(*point, points[second]);
            if d <= max_distance {
                edges.push(NavEdge {
                    first,
                    second,
                    distance: d,
                });
            }
        }
    }
    edges
}

/// Shared handle following single-writer / multiple-reader discipline.
///
/// Searches work on an `Arc` snapshot, so a rebuild never disturbs a search
/// that is already running; it only affects snapshots taken afterwards.
#[derive(Debug)]
pub struct SharedGraph {
    current: RwLock<Arc<NavGraph>>,
}

impl SharedGraph {
    pub fn new(graph: NavGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// The graph as of now.
    pub fn snapshot(&self) -> Arc<NavGraph> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Build a replacement graph and publish it once complete.
    ///
    /// The build happens outside the lock; a failed build leaves the current
    /// graph in place.
    pub fn rebuild(&self, stars: &[StarRecord], max_distance: Option<f64>) -> Result<Arc<NavGraph>> {
        let options = self.snapshot().options();
        let mut fresh = NavGraph::build_with_options(stars, options)?;
        if let Some(limit) = max_distance {
            fresh.connect_within(limit)?;
        }

        let fresh = Arc::new(fresh);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&fresh);
        Ok(fresh)
    }
}
