//! Depth-first reachability.

use std::slice;

use crate::error::GraphError;
use crate::graph::{Edge, Graph};

/// Depth-first explorer over a borrowed [`Graph`].
#[derive(Debug, Clone, Copy)]
pub struct Dfs<'g> {
    graph: &'g Graph,
}

impl<'g> Dfs<'g> {
    /// Create an explorer. Fails with [`GraphError::InvalidGraph`] if the
    /// graph has no nodes.
    pub fn new(graph: &'g Graph) -> Result<Self, GraphError> {
        if graph.is_empty() {
            return Err(GraphError::InvalidGraph);
        }
        Ok(Self { graph })
    }

    /// Every node reachable from `root`, in depth-first pre-order.
    ///
    /// Neighbors are followed in adjacency order, so the result matches a
    /// plain recursive pre-order walk. The walk itself keeps an explicit
    /// stack of partially consumed adjacency lists and never recurses.
    ///
    /// Fails with [`GraphError::UnknownNode`] if `root`, or a node the walk
    /// has to expand, is not declared in the graph.
    pub fn explore(&self, root: &str) -> Result<Vec<String>, GraphError> {
        let root = self
            .graph
            .declared_id(root)
            .ok_or_else(|| GraphError::UnknownNode(root.to_string()))?;

        let mut visited = vec![false; self.graph.capacity()];
        let mut order = vec![root];
        let mut stack = vec![self.expand(root)?];
        visited[root] = true;

        while let Some(frame) = stack.last_mut() {
            let Some(edge) = frame.next() else {
                stack.pop();
                continue;
            };
            if visited[edge.to] {
                continue;
            }
            visited[edge.to] = true;
            order.push(edge.to);
            stack.push(self.expand(edge.to)?);
        }

        Ok(order
            .into_iter()
            .map(|id| self.graph.key(id).to_string())
            .collect())
    }

    fn expand(&self, id: usize) -> Result<slice::Iter<'g, Edge>, GraphError> {
        self.graph
            .edges(id)
            .map(<[Edge]>::iter)
            .ok_or_else(|| self.graph.unknown(id))
    }
}
