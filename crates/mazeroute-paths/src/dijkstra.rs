use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::error::GraphError;
use crate::graph::Graph;

/// Outcome of a shortest-path query.
///
/// An unreachable target is reported with an infinite distance and an
/// empty path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub distance: f64,
    pub path: Vec<String>,
}

impl Route {
    fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    /// Whether a path to the target exists.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// A node with its final distance, returned from [`Dijkstra::distance_map`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reached {
    pub node: String,
    pub distance: f64,
}

/// How the solver picks the next node to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frontier {
    /// Linear scan below [`SolverConfig::heap_threshold`] nodes, heap above.
    #[default]
    Auto,
    /// Scan the unsettled nodes for the first minimum. O(n²).
    LinearScan,
    /// Binary heap with lazy deletion. O((n + e) log n).
    BinaryHeap,
}

/// Solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    pub frontier: Frontier,
    /// Node count from which [`Frontier::Auto`] switches to the heap.
    pub heap_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            frontier: Frontier::Auto,
            heap_threshold: 64,
        }
    }
}

impl SolverConfig {
    fn uses_heap(&self, nodes: usize) -> bool {
        match self.frontier {
            Frontier::Auto => nodes >= self.heap_threshold,
            Frontier::LinearScan => false,
            Frontier::BinaryHeap => true,
        }
    }
}

/// Heap entry ordered by distance, then by declaration rank.
#[derive(Clone, Copy)]
struct Candidate {
    id: usize,
    rank: usize,
    dist: f64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the smallest distance,
        // and among equal distances the earliest declared node.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Per-call working tables, indexed by interned node id.
struct Search {
    dist: Vec<f64>,
    pred: Vec<Option<usize>>,
    settled: Vec<usize>,
}

/// Single-source shortest-path solver over a borrowed [`Graph`].
///
/// The solver holds no mutable state: every query allocates its own
/// tables, so one solver (or many) can serve concurrent queries.
#[derive(Debug, Clone, Copy)]
pub struct Dijkstra<'g> {
    graph: &'g Graph,
    config: SolverConfig,
}

impl<'g> Dijkstra<'g> {
    /// Create a solver with the default [`SolverConfig`].
    ///
    /// Fails with [`GraphError::InvalidGraph`] if the graph has no nodes.
    pub fn new(graph: &'g Graph) -> Result<Self, GraphError> {
        Self::with_config(graph, SolverConfig::default())
    }

    pub fn with_config(graph: &'g Graph, config: SolverConfig) -> Result<Self, GraphError> {
        if graph.is_empty() {
            return Err(GraphError::InvalidGraph);
        }
        Ok(Self { graph, config })
    }

    /// Minimum-cost route from `source` to `target`.
    ///
    /// Nodes are settled by lowest tentative distance, ties going to the
    /// node declared first; an edge only updates a neighbor when it is
    /// strictly shorter. Both frontier strategies therefore settle nodes in
    /// the same order and return the same path.
    ///
    /// Fails with [`GraphError::UnknownNode`] if either endpoint is not
    /// declared, or if a reachable node has an edge to an undeclared one.
    /// Fails with [`GraphError::DistanceOverflow`] if the sum of finite
    /// weights along some explored path is not representable.
    pub fn resolve(&self, source: &str, target: &str) -> Result<Route, GraphError> {
        let src = self.lookup(source)?;
        let dst = self.lookup(target)?;
        let search = self.search(src)?;

        let distance = search.dist[dst];
        debug!(
            "resolved {source:?} -> {target:?}: distance {distance}, {} nodes settled",
            search.settled.len()
        );
        if !distance.is_finite() {
            return Ok(Route::unreachable());
        }

        let mut path = vec![dst];
        let mut cur = dst;
        while let Some(prev) = search.pred[cur] {
            path.push(prev);
            cur = prev;
        }
        path.reverse();

        Ok(Route {
            distance,
            path: path
                .into_iter()
                .map(|id| self.graph.key(id).to_string())
                .collect(),
        })
    }

    /// Every node reachable from `source` with its shortest distance, in
    /// the order the nodes were settled (`source` first, at distance 0).
    pub fn distance_map(&self, source: &str) -> Result<Vec<Reached>, GraphError> {
        let src = self.lookup(source)?;
        let search = self.search(src)?;
        Ok(search
            .settled
            .iter()
            .map(|&id| Reached {
                node: self.graph.key(id).to_string(),
                distance: search.dist[id],
            })
            .collect())
    }

    fn lookup(&self, key: &str) -> Result<usize, GraphError> {
        self.graph
            .declared_id(key)
            .ok_or_else(|| GraphError::UnknownNode(key.to_string()))
    }

    fn search(&self, source: usize) -> Result<Search, GraphError> {
        let n = self.graph.capacity();
        let mut search = Search {
            dist: vec![f64::INFINITY; n],
            pred: vec![None; n],
            settled: Vec::new(),
        };
        search.dist[source] = 0.0;

        if self.config.uses_heap(self.graph.len()) {
            trace!("frontier: binary heap");
            self.run_heap(&mut search, source)?;
        } else {
            trace!("frontier: linear scan");
            self.run_linear(&mut search)?;
        }
        Ok(search)
    }

    fn run_linear(&self, search: &mut Search) -> Result<(), GraphError> {
        let mut unsettled = self.graph.declaration_order().to_vec();
        loop {
            let mut lowest: Option<(usize, f64)> = None;
            for (pos, &id) in unsettled.iter().enumerate() {
                let d = search.dist[id];
                let better = match lowest {
                    None => d.is_finite(),
                    Some((_, best)) => d < best,
                };
                if better {
                    lowest = Some((pos, d));
                }
            }
            let Some((pos, _)) = lowest else {
                return Ok(());
            };
            let id = unsettled.remove(pos);
            self.settle(search, id, |_, _| {})?;
        }
    }

    fn run_heap(&self, search: &mut Search, source: usize) -> Result<(), GraphError> {
        let mut rank = vec![usize::MAX; self.graph.capacity()];
        for (r, &id) in self.graph.declaration_order().iter().enumerate() {
            rank[id] = r;
        }
        let mut done = vec![false; self.graph.capacity()];

        let mut open = BinaryHeap::new();
        open.push(Candidate {
            id: source,
            rank: rank[source],
            dist: 0.0,
        });

        while let Some(current) = open.pop() {
            // Skip stale entries.
            if done[current.id] || current.dist > search.dist[current.id] {
                continue;
            }
            done[current.id] = true;
            self.settle(search, current.id, |id, dist| {
                open.push(Candidate {
                    id,
                    rank: rank[id],
                    dist,
                });
            })?;
        }
        Ok(())
    }

    /// Relax every outgoing edge of `id` and mark it settled. `improved`
    /// is called for each neighbor whose tentative distance dropped.
    fn settle(
        &self,
        search: &mut Search,
        id: usize,
        mut improved: impl FnMut(usize, f64),
    ) -> Result<(), GraphError> {
        let base = search.dist[id];
        trace!("settle {:?} at {base}", self.graph.key(id));

        let edges = self.graph.edges(id).ok_or_else(|| self.graph.unknown(id))?;
        for edge in edges {
            if self.graph.edges(edge.to).is_none() {
                return Err(self.graph.unknown(edge.to));
            }
            let candidate = base + edge.weight;
            if candidate.is_infinite() {
                return Err(GraphError::DistanceOverflow {
                    node: self.graph.key(edge.to).to_string(),
                });
            }
            if candidate < search.dist[edge.to] {
                search.dist[edge.to] = candidate;
                search.pred[edge.to] = Some(id);
                improved(edge.to, candidate);
            }
        }
        search.settled.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeRecord;

    const STRATEGIES: [Frontier; 3] = [Frontier::Auto, Frontier::LinearScan, Frontier::BinaryHeap];

    fn solver(graph: &Graph, frontier: Frontier) -> Dijkstra<'_> {
        let config = SolverConfig {
            frontier,
            ..SolverConfig::default()
        };
        Dijkstra::with_config(graph, config).unwrap()
    }

    fn weighted() -> Graph {
        Graph::from_adjacency([
            ("0", vec![("1", 5), ("2", 2)]),
            ("1", vec![("3", 4), ("4", 2)]),
            ("2", vec![("1", 8), ("4", 7)]),
            ("3", vec![("5", 3), ("4", 6)]),
            ("4", vec![("5", 1)]),
            ("5", vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_weighted_graph() {
        let g = weighted();
        for frontier in STRATEGIES {
            let route = solver(&g, frontier).resolve("0", "5").unwrap();
            assert_eq!(route.distance, 8.0, "{frontier:?}");
            assert_eq!(route.path, ["0", "1", "4", "5"], "{frontier:?}");
            assert!(route.is_reachable());
        }
    }

    #[test]
    fn source_equals_target() {
        let g = weighted();
        for frontier in STRATEGIES {
            let route = solver(&g, frontier).resolve("3", "3").unwrap();
            assert_eq!(route.distance, 0.0);
            assert_eq!(route.path, ["3"]);
        }
    }

    #[test]
    fn unreachable_target_gives_empty_path() {
        let g = weighted();
        for frontier in STRATEGIES {
            let route = solver(&g, frontier).resolve("5", "0").unwrap();
            assert_eq!(route.distance, f64::INFINITY);
            assert!(route.path.is_empty());
            assert!(!route.is_reachable());
        }
    }

    #[test]
    fn ties_go_to_the_first_declared_node() {
        // Two equal-cost routes a->b->d and a->c->d; b is declared first.
        let g = Graph::from_adjacency([
            ("a", vec![("c", 1), ("b", 1)]),
            ("b", vec![("d", 1)]),
            ("c", vec![("d", 1)]),
            ("d", vec![]),
        ])
        .unwrap();
        for frontier in STRATEGIES {
            let route = solver(&g, frontier).resolve("a", "d").unwrap();
            assert_eq!(route.path, ["a", "b", "d"], "{frontier:?}");
        }
    }

    #[test]
    fn structured_costs_are_used() {
        let mut g = Graph::new();
        g.add_edge("s", "t", EdgeRecord { cost: 10.0 }).unwrap();
        g.add_edge("s", "m", EdgeRecord { cost: 2.5 }).unwrap();
        g.add_edge("m", "t", 2.5).unwrap();
        g.add_node("t");
        let route = Dijkstra::new(&g).unwrap().resolve("s", "t").unwrap();
        assert_eq!(route.distance, 5.0);
        assert_eq!(route.path, ["s", "m", "t"]);
    }

    #[test]
    fn zero_weight_edges() {
        let g = Graph::from_adjacency([
            ("a", vec![("b", 0)]),
            ("b", vec![("c", 0), ("a", 0)]),
            ("c", vec![]),
        ])
        .unwrap();
        for frontier in STRATEGIES {
            let route = solver(&g, frontier).resolve("a", "c").unwrap();
            assert_eq!(route.distance, 0.0);
            assert_eq!(route.path, ["a", "b", "c"]);
        }
    }

    #[test]
    fn empty_graph_is_rejected() {
        assert_eq!(
            Dijkstra::new(&Graph::new()).unwrap_err(),
            GraphError::InvalidGraph
        );
    }

    #[test]
    fn unknown_endpoints_are_named() {
        let g = weighted();
        let d = Dijkstra::new(&g).unwrap();
        assert_eq!(
            d.resolve("x", "5").unwrap_err(),
            GraphError::UnknownNode("x".into())
        );
        assert_eq!(
            d.resolve("0", "y").unwrap_err(),
            GraphError::UnknownNode("y".into())
        );
    }

    #[test]
    fn undeclared_destination_fails_when_reached() {
        let mut g = Graph::new();
        g.add_edge("a", "ghost", 1).unwrap();
        g.add_node("b");
        for frontier in STRATEGIES {
            assert_eq!(
                solver(&g, frontier).resolve("a", "a").unwrap_err(),
                GraphError::UnknownNode("ghost".into())
            );
            // Never reached from b, so never expanded.
            let route = solver(&g, frontier).resolve("b", "a").unwrap();
            assert!(!route.is_reachable());
        }
    }

    #[test]
    fn overflowing_distance_is_an_error() {
        let g = Graph::from_adjacency([
            ("a", vec![("b", f64::MAX)]),
            ("b", vec![("c", f64::MAX)]),
            ("c", vec![]),
        ])
        .unwrap();
        for frontier in STRATEGIES {
            let d = solver(&g, frontier);
            assert_eq!(
                d.resolve("a", "c").unwrap_err(),
                GraphError::DistanceOverflow { node: "c".into() },
                "{frontier:?}"
            );
            assert_eq!(d.resolve("b", "c").unwrap().distance, f64::MAX);
            assert!(d.distance_map("a").is_err());
        }
    }

    #[test]
    fn distance_map_lists_settle_order() {
        let g = weighted();
        let reached = Dijkstra::new(&g).unwrap().distance_map("0").unwrap();
        let got: Vec<(&str, f64)> = reached
            .iter()
            .map(|r| (r.node.as_str(), r.distance))
            .collect();
        assert_eq!(
            got,
            vec![
                ("0", 0.0),
                ("2", 2.0),
                ("1", 5.0),
                ("4", 7.0),
                ("5", 8.0),
                ("3", 9.0),
            ]
        );
    }

    #[test]
    fn distance_map_skips_unreachable_nodes() {
        let g = weighted();
        let reached = Dijkstra::new(&g).unwrap().distance_map("4").unwrap();
        assert_eq!(reached.len(), 2);
        assert_eq!(reached[1].node, "5");
    }

    #[test]
    fn auto_frontier_switches_on_threshold() {
        let config = SolverConfig::default();
        assert!(!config.uses_heap(config.heap_threshold - 1));
        assert!(config.uses_heap(config.heap_threshold));
        let linear = SolverConfig {
            frontier: Frontier::LinearScan,
            ..config
        };
        assert!(!linear.uses_heap(usize::MAX));
    }

    #[test]
    fn heap_orders_by_distance_then_rank() {
        let mut open = BinaryHeap::new();
        for (id, rank, dist) in [(0, 2, 1.0), (1, 1, 1.0), (2, 0, 3.0), (3, 3, 0.5)] {
            open.push(Candidate { id, rank, dist });
        }
        let order: Vec<usize> = std::iter::from_fn(|| open.pop().map(|c| c.id)).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }
}
