//! Shortest paths and reachability over weighted directed graphs.
//!
//! This crate provides:
//!
//! - a string-keyed directed [`Graph`] with non-negative weights, accepting
//!   bare weights or `cost` records as edge values ([`EdgeValue`]);
//! - conversion of a grid [`Map`](mazeroute_core::Map) into such a graph,
//!   with 4- or 8-way unit-cost moves ([`convert_grid_to_graph`]);
//! - depth-first reachability ([`Dfs`]);
//! - single-source shortest paths ([`Dijkstra`]).
//!
//! Traversals borrow the graph immutably and allocate their working
//! tables per call, so a graph can be queried from many threads at once.
//!
//! ```
//! use mazeroute_core::Map;
//! use mazeroute_paths::{convert_grid_to_graph, dijkstra_resolve};
//!
//! let map = Map::parse("S X\n  E").unwrap();
//! let grid = convert_grid_to_graph(&map, false);
//! let (start, exit) = (grid.start.unwrap(), grid.exit.unwrap());
//! let route = dijkstra_resolve(&grid.graph, &start, &exit).unwrap();
//! assert_eq!(route.distance, 3.0);
//! assert_eq!(route.path, ["0:0", "1:0", "1:1", "2:1"]);
//! ```

mod convert;
mod dfs;
mod dijkstra;
mod error;
mod graph;
mod neighbors;

pub use convert::{GridGraph, convert_grid_to_graph};
pub use dfs::Dfs;
pub use dijkstra::{Dijkstra, Frontier, Reached, Route, SolverConfig};
pub use error::GraphError;
pub use graph::{Adjacent, EdgeRecord, EdgeValue, Graph};
pub use neighbors::{DIAGONAL, Neighbors, ORTHOGONAL};

/// Depth-first pre-order of the nodes reachable from `root`.
///
/// Shorthand for [`Dfs::new`] followed by [`Dfs::explore`].
pub fn dfs_explore(graph: &Graph, root: &str) -> Result<Vec<String>, GraphError> {
    Dfs::new(graph)?.explore(root)
}

/// Shortest route from `source` to `target` with the default solver
/// settings.
///
/// Shorthand for [`Dijkstra::new`] followed by [`Dijkstra::resolve`].
pub fn dijkstra_resolve(graph: &Graph, source: &str, target: &str) -> Result<Route, GraphError> {
    Dijkstra::new(graph)?.resolve(source, target)
}
