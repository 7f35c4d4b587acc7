use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::graph::{NavEdge, NavGraph};

/// Grid that path costs are snapped to before comparison (light-years).
const COST_QUANTUM: f64 = 1e-9;

/// Search-time restrictions layered over a built graph.
///
/// The graph's edge set is never modified; the mask decides which edges and
/// nodes a single search may use.
#[derive(Debug, Clone)]
pub struct SearchMask {
    max_jump: Option<f64>,
    min_jump: Option<f64>,
    blocked_nodes: Vec<bool>,
    blocked_edges: HashSet<usize>,
}

impl SearchMask {
    /// A mask that allows every non-degenerate edge of `graph`.
    pub fn new(graph: &NavGraph) -> Self {
        Self {
            max_jump: None,
            min_jump: None,
            blocked_nodes: vec![false; graph.len()],
            blocked_edges: HashSet::new(),
        }
    }

    /// Ignore edges longer than `limit`.
    pub fn with_max_jump(mut self, limit: Option<f64>) -> Self {
        self.max_jump = limit;
        self
    }

    /// Ignore edges whose length is at or below `limit`.
    pub fn with_min_jump(mut self, limit: Option<f64>) -> Self {
        self.min_jump = limit;
        self
    }

    pub fn block_node(&mut self, node: usize) {
        if let Some(slot) = self.blocked_nodes.get_mut(node) {
            *slot = true;
        }
    }

    pub fn block_edge(&mut self, edge: usize) {
        self.blocked_edges.insert(edge);
    }

    pub fn allows_node(&self, node: usize) -> bool {
        !self.blocked_nodes.get(node).copied().unwrap_or(true)
    }

    /// Whether a search may traverse `edge` (stored at `edge_index`).
    pub fn allows_edge(&self, edge_index: usize, edge: &NavEdge) -> bool {
        if edge.is_degenerate() {
            return false;
        }

        if let Some(limit) = self.max_jump {
            if edge.distance > limit {
                return false;
            }
        }

        if let Some(limit) = self.min_jump {
            if edge.distance <= limit {
                return false;
            }
        }

        !self.blocked_edges.contains(&edge_index)
    }
}

/// A node-index path with its cumulative cost.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCandidate {
    pub nodes: Vec<usize>,
    pub cost: f64,
}

impl PathCandidate {
    /// Path consisting of a single node.
    pub fn single(node: usize) -> Self {
        Self {
            nodes: vec![node],
            cost: 0.0,
        }
    }

    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    fn extended(&self, node: usize, length: f64) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        Self {
            nodes,
            cost: self.cost + length,
        }
    }

    /// Append `next`, which must start where this path ends.
    pub fn join(mut self, next: &PathCandidate) -> Self {
        self.nodes.extend_from_slice(&next.nodes[1..]);
        self.cost += next.cost;
        self
    }
}

/// Compare costs after snapping both to a [`COST_QUANTUM`] grid.
///
/// Costs that differ only by summation rounding compare equal. Snapping keeps
/// the comparison a total order, which sorting and the search heap rely on.
pub fn compare_cost(a: f64, b: f64) -> Ordering {
    cost_key(a).cmp(&cost_key(b))
}

fn cost_key(cost: f64) -> i64 {
    // `as` saturates, so infinite costs land at the ends of the range.
    (cost / COST_QUANTUM).round() as i64
}

/// Route ranking: lower cost, then fewer hops, then the lexicographically
/// smaller node-index sequence.
pub fn compare_paths(a: &PathCandidate, b: &PathCandidate) -> Ordering {
    compare_cost(a.cost, b.cost)
        .then_with(|| a.hops().cmp(&b.hops()))
        .then_with(|| a.nodes.cmp(&b.nodes))
}

/// Best path from `start` to `goal` under `mask`, ranked by [`compare_paths`].
pub fn shortest_path(
    graph: &NavGraph,
    start: usize,
    goal: usize,
    mask: &SearchMask,
) -> Option<PathCandidate> {
    if !mask.allows_node(start) || !mask.allows_node(goal) {
        return None;
    }
    if start == goal {
        return Some(PathCandidate::single(start));
    }

    let mut best: Vec<Option<PathCandidate>> = vec![None; graph.len()];
    let mut settled = vec![false; graph.len()];
    let mut queue = BinaryHeap::new();

    let origin = PathCandidate::single(start);
    best[start] = Some(origin.clone());
    queue.push(QueueEntry(origin));

    while let Some(QueueEntry(label)) = queue.pop() {
        let Some(&node) = label.nodes.last() else {
            continue;
        };
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if node == goal {
            return Some(label);
        }

        for adjacent in graph.neighbours(node) {
            let next = adjacent.node;
            if settled[next] || !mask.allows_node(next) {
                continue;
            }
            let Some(edge) = graph.edge(adjacent.edge) else {
                continue;
            };
            if !mask.allows_edge(adjacent.edge, edge) {
                continue;
            }

            let candidate = label.extended(next, edge.distance);
            let improves = match &best[next] {
                Some(current) => compare_paths(&candidate, current) == Ordering::Less,
                None => true,
            };
            if improves {
                best[next] = Some(candidate.clone());
                queue.push(QueueEntry(candidate));
            }
        }
    }

    None
}

/// Up to `k` loopless paths in rank order (Yen's algorithm).
pub fn k_shortest_paths(
    graph: &NavGraph,
    start: usize,
    goal: usize,
    mask: &SearchMask,
    k: usize,
) -> Vec<PathCandidate> {
    let mut accepted: Vec<PathCandidate> = Vec::new();
    if k == 0 {
        return accepted;
    }
    let Some(first) = shortest_path(graph, start, goal, mask) else {
        return accepted;
    };
    accepted.push(first);

    let mut pending: Vec<PathCandidate> = Vec::new();

    while accepted.len() < k {
        let previous = accepted[accepted.len() - 1].clone();

        for spur_index in 0..previous.hops() {
            let spur_node = previous.nodes[spur_index];
            let root = &previous.nodes[..=spur_index];

            let mut spur_mask = mask.clone();
            for path in &accepted {
                if path.nodes.len() > spur_index + 1 && path.nodes[..=spur_index] == *root {
                    if let Some(edge) =
                        edge_between(graph, path.nodes[spur_index], path.nodes[spur_index + 1])
                    {
                        spur_mask.block_edge(edge);
                    }
                }
            }
            for &node in &root[..spur_index] {
                spur_mask.block_node(node);
            }

            let Some(spur) = shortest_path(graph, spur_node, goal, &spur_mask) else {
                continue;
            };

            let mut nodes = root[..spur_index].to_vec();
            nodes.extend_from_slice(&spur.nodes);
            let Some(cost) = path_cost(graph, &nodes) else {
                continue;
            };
            let candidate = PathCandidate { nodes, cost };

            let known = accepted.iter().any(|p| p.nodes == candidate.nodes)
                || pending.iter().any(|p| p.nodes == candidate.nodes);
            if !known {
                pending.push(candidate);
            }
        }

        if pending.is_empty() {
            break;
        }
        pending.sort_by(compare_paths);
        accepted.push(pending.remove(0));
    }

    accepted
}

/// Index of the edge joining `a` and `b`, if any.
pub fn edge_between(graph: &NavGraph, a: usize, b: usize) -> Option<usize> {
    let neighbours = graph.neighbours(a);
    neighbours
        .binary_search_by_key(&b, |adjacent| adjacent.node)
        .ok()
        .map(|position| neighbours[position].edge)
}

/// Sum of edge lengths along `nodes`, or `None` if two consecutive nodes are
/// not joined by an edge.
pub fn path_cost(graph: &NavGraph, nodes: &[usize]) -> Option<f64> {
    nodes.windows(2).try_fold(0.0, |total, pair| {
        let edge = edge_between(graph, pair[0], pair[1]).and_then(|index| graph.edge(index))?;
        Some(total + edge.distance)
    })
}

#[derive(Debug, Clone, PartialEq)]
struct QueueEntry(PathCandidate);

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by rank.
        compare_paths(&other.0, &self.0)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StarRecord;
    use crate::geometry::Position;

    fn square() -> NavGraph {
        // 0 --- 1
        // |     |
        // 2 --- 3   (unit square, diagonals longer than the threshold)
        let stars = vec![
            StarRecord::new("a", "A", Position::new(0.0, 0.0, 0.0)),
            StarRecord::new("b", "B", Position::new(1.0, 0.0, 0.0)),
            StarRecord::new("c", "C", Position::new(0.0, 1.0, 0.0)),
            StarRecord::new("d", "D", Position::new(1.0, 1.0, 0.0)),
        ];
        NavGraph::connected(&stars, 1.0).expect("graph builds")
    }

    #[test]
    fn compare_cost_tolerates_rounding() {
        assert_eq!(compare_cost(0.1 + 0.2, 0.3), Ordering::Equal);
        assert_eq!(compare_cost(1.0, 2.0), Ordering::Less);
        assert_eq!(compare_cost(2.0, 1.0), Ordering::Greater);
    }

    #[test]
    fn compare_cost_is_transitive_for_chained_near_ties() {
        let (a, b, c) = (1.0, 1.0 + 0.6e-9, 1.0 + 1.2e-9);
        let ab = compare_cost(a, b);
        let bc = compare_cost(b, c);
        let ac = compare_cost(a, c);
        if ab == Ordering::Equal && bc == Ordering::Equal {
            assert_eq!(ac, Ordering::Equal);
        }
        assert_ne!(ac, Ordering::Greater);
        assert_ne!(ab, Ordering::Greater);
        assert_ne!(bc, Ordering::Greater);
    }

    #[test]
    fn sorting_near_tied_candidates_is_consistent() {
        let mut candidates: Vec<PathCandidate> = (0..40)
            .map(|i| PathCandidate {
                nodes: vec![0, 40 - i],
                cost: 2.0 + (i % 7) as f64 * 0.4e-9,
            })
            .collect();
        candidates.sort_by(compare_paths);
        for pair in candidates.windows(2) {
            assert_ne!(compare_paths(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn equal_cost_paths_break_ties_lexicographically() {
        let graph = square();
        let mask = SearchMask::new(&graph);
        let path = shortest_path(&graph, 0, 3, &mask).expect("path exists");
        assert_eq!(path.nodes, vec![0, 1, 3]);
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn blocked_node_forces_detour() {
        let graph = square();
        let mut mask = SearchMask::new(&graph);
        mask.block_node(1);
        let path = shortest_path(&graph, 0, 3, &mask).expect("path exists");
        assert_eq!(path.nodes, vec![0, 2, 3]);
    }

    #[test]
    fn max_jump_filter_disconnects() {
        let graph = square();
        let mask = SearchMask::new(&graph).with_max_jump(Some(0.5));
        assert!(shortest_path(&graph, 0, 3, &mask).is_none());
    }

    #[test]
    fn min_jump_is_exclusive() {
        let graph = square();
        let mask = SearchMask::new(&graph).with_min_jump(Some(1.0));
        assert!(shortest_path(&graph, 0, 1, &mask).is_none());
    }

    #[test]
    fn yen_returns_both_square_routes() {
        let graph = square();
        let mask = SearchMask::new(&graph);
        let paths = k_shortest_paths(&graph, 0, 3, &mask, 5);
        let sequences: Vec<Vec<usize>> = paths.iter().map(|p| p.nodes.clone()).collect();
        assert_eq!(sequences, vec![vec![0, 1, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn path_cost_requires_edges() {
        let graph = square();
        assert_eq!(path_cost(&graph, &[0, 1, 3]), Some(2.0));
        assert_eq!(path_cost(&graph, &[0, 3]), None);
        assert_eq!(path_cost(&graph, &[2]), Some(0.0));
    }

    #[test]
    fn join_concatenates_legs() {
        let first = PathCandidate {
            nodes: vec![0, 1],
            cost: 1.0,
        };
        let second = PathCandidate {
            nodes: vec![1, 3],
            cost: 1.0,
        };
        let joined = first.join(&second);
        assert_eq!(joined.nodes, vec![0, 1, 3]);
        assert_eq!(joined.cost, 2.0);
    }
}
