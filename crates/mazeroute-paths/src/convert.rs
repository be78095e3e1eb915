//! Grid-to-graph conversion.

use log::{debug, trace};
use mazeroute_core::{Map, Point, Tile, node_key, parse_node_key};

use crate::graph::Graph;
use crate::neighbors::Neighbors;

/// A graph derived from a [`Map`], with the keys of its first start and
/// exit markers.
#[derive(Debug, Clone, Default)]
pub struct GridGraph {
    pub graph: Graph,
    pub start: Option<String>,
    pub exit: Option<String>,
}

impl GridGraph {
    /// Coordinates of the start marker.
    pub fn start_point(&self) -> Option<Point> {
        self.start.as_deref().and_then(parse_node_key)
    }

    /// Coordinates of the exit marker.
    pub fn exit_point(&self) -> Option<Point> {
        self.exit.as_deref().and_then(parse_node_key)
    }
}

/// Convert a map into a directed graph with unit edge weights.
///
/// Every navigable cell becomes a node keyed `"<x>:<y>"`, with an edge to
/// each in-bounds, non-wall neighbor: orthogonal moves always, diagonal
/// moves when `allow_diagonal` is set. Diagonals may pass between two
/// walls. Only the first start and first exit marker in row-major order
/// are recorded; a missing marker is reported as `None`.
pub fn convert_grid_to_graph(map: &Map, allow_diagonal: bool) -> GridGraph {
    let mut out = GridGraph::default();
    let mut nb = Neighbors::new();
    let open = |p: Point| map.at(p).is_some_and(Tile::is_navigable);

    for (p, tile) in map.iter() {
        match tile {
            Tile::Wall => continue,
            Tile::Start => record_marker(&mut out.start, p, "start"),
            Tile::Exit => record_marker(&mut out.exit, p, "exit"),
            Tile::Empty => {}
        }

        let from = out.graph.declare(node_key(p));
        let moves = if allow_diagonal {
            nb.all(p, open)
        } else {
            nb.cardinal(p, open)
        };
        for &q in moves {
            let to = out.graph.intern(node_key(q));
            out.graph.insert_edge(from, to, 1.0);
        }
    }

    debug!(
        "converted {}x{} map (diagonal: {}): {} nodes, {} edges, start {:?}, exit {:?}",
        map.width(),
        map.height(),
        allow_diagonal,
        out.graph.len(),
        out.graph.edge_count(),
        out.start,
        out.exit,
    );
    out
}

fn record_marker(slot: &mut Option<String>, p: Point, what: &str) {
    if slot.is_some() {
        trace!("ignoring extra {what} marker at {p}");
        return;
    }
    *slot = Some(node_key(p));
}
