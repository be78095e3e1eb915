//! Directed weighted graph keyed by string node identifiers.
//!
//! Keys are interned into dense indices so the solvers can work with flat
//! tables. Every key gets an index the first time it is seen, either as a
//! source (a *declared* node, with its own adjacency list) or as an edge
//! destination only (a *referenced* node, with no adjacency list yet).
//! Only declared nodes are keys of the graph.

use std::collections::HashMap;

use crate::error::GraphError;

/// Structured edge carrying an explicit cost.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub cost: f64,
}

/// An edge value as supplied by callers: either a bare weight or a record
/// with a `cost` field. Both shapes normalize to the same `f64` weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum EdgeValue {
    Weight(f64),
    Record(EdgeRecord),
}

impl EdgeValue {
    /// The plain weight of this edge.
    #[inline]
    pub fn cost(self) -> f64 {
        match self {
            EdgeValue::Weight(w) => w,
            EdgeValue::Record(r) => r.cost,
        }
    }
}

impl From<f64> for EdgeValue {
    fn from(w: f64) -> Self {
        EdgeValue::Weight(w)
    }
}

impl From<i32> for EdgeValue {
    fn from(w: i32) -> Self {
        EdgeValue::Weight(f64::from(w))
    }
}

impl From<u32> for EdgeValue {
    fn from(w: u32) -> Self {
        EdgeValue::Weight(f64::from(w))
    }
}

impl From<EdgeRecord> for EdgeValue {
    fn from(r: EdgeRecord) -> Self {
        EdgeValue::Record(r)
    }
}

/// Normalized outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Edge {
    pub(crate) to: usize,
    pub(crate) weight: f64,
}

/// A directed graph with non-negative edge weights.
///
/// Nodes enumerate in declaration order and each adjacency list in edge
/// insertion order. The solvers rely on both orders for deterministic
/// tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    // `None` for nodes that are only referenced as a destination.
    adjacency: Vec<Option<Vec<Edge>>>,
    declared: Vec<usize>,
    edge_count: usize,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(node, [(destination, edge), ...])` entries.
    ///
    /// Entries are declared in iteration order; a node with no outgoing
    /// edges still needs an entry with an empty adjacency.
    pub fn from_adjacency<I, K, A, D, E>(entries: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (K, A)>,
        K: Into<String>,
        A: IntoIterator<Item = (D, E)>,
        D: Into<String>,
        E: Into<EdgeValue>,
    {
        let mut graph = Self::new();
        for (node, adjacency) in entries {
            let from = graph.declare(node);
            for (to, edge) in adjacency {
                let to: String = to.into();
                let weight = checked_weight(graph.key(from), &to, edge.into())?;
                let to = graph.intern(to);
                graph.insert_edge(from, to, weight);
            }
        }
        Ok(graph)
    }

    /// Declare `key` as a node. Declaring an existing node is a no-op.
    pub fn add_node(&mut self, key: impl Into<String>) {
        self.declare(key);
    }

    /// Add a directed edge, declaring `from` and referencing `to`.
    ///
    /// Re-adding an existing edge replaces its weight but keeps its
    /// position in the adjacency order.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        edge: impl Into<EdgeValue>,
    ) -> Result<(), GraphError> {
        let (from, to): (String, String) = (from.into(), to.into());
        let weight = checked_weight(&from, &to, edge.into())?;
        let from = self.declare(from);
        let to = self.intern(to);
        self.insert_edge(from, to, weight);
        Ok(())
    }

    /// Whether `key` is a declared node.
    #[inline]
    pub fn has_node(&self, key: &str) -> bool {
        self.declared_id(key).is_some()
    }

    /// All declared node keys, in declaration order.
    pub fn node_keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.declared.iter().map(|&id| self.keys[id].as_str())
    }

    /// Outgoing edges of `key` as `(destination, weight)` pairs.
    pub fn neighbors(&self, key: &str) -> Result<Adjacent<'_>, GraphError> {
        let edges = self
            .declared_id(key)
            .and_then(|id| self.edges(id))
            .ok_or_else(|| GraphError::UnknownNode(key.to_string()))?;
        Ok(Adjacent {
            keys: &self.keys,
            edges: edges.iter(),
        })
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        let to = *self.index.get(to)?;
        let edges = self.edges(self.declared_id(from)?)?;
        edges.iter().find(|e| e.to == to).map(|e| e.weight)
    }

    /// Number of declared nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Total number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    // -----------------------------------------------------------------------
    // Index-level access for the solvers and the grid converter
    // -----------------------------------------------------------------------

    /// Intern `key` without declaring it.
    pub(crate) fn intern(&mut self, key: impl Into<String>) -> usize {
        let key = key.into();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.adjacency.push(None);
        id
    }

    /// Intern and declare `key`.
    pub(crate) fn declare(&mut self, key: impl Into<String>) -> usize {
        let id = self.intern(key);
        if self.adjacency[id].is_none() {
            self.adjacency[id] = Some(Vec::new());
            self.declared.push(id);
        }
        id
    }

    /// Insert an already validated edge between two interned nodes.
    pub(crate) fn insert_edge(&mut self, from: usize, to: usize, weight: f64) {
        let edges = self.adjacency[from].get_or_insert_with(Vec::new);
        if let Some(existing) = edges.iter_mut().find(|e| e.to == to) {
            existing.weight = weight;
        } else {
            edges.push(Edge { to, weight });
            self.edge_count += 1;
        }
    }

    #[inline]
    pub(crate) fn declared_id(&self, key: &str) -> Option<usize> {
        let id = *self.index.get(key)?;
        self.adjacency[id].is_some().then_some(id)
    }

    /// Outgoing edges of a node, `None` if it is only referenced.
    #[inline]
    pub(crate) fn edges(&self, id: usize) -> Option<&[Edge]> {
        self.adjacency[id].as_deref()
    }

    #[inline]
    pub(crate) fn key(&self, id: usize) -> &str {
        &self.keys[id]
    }

    /// Size of per-node tables: declared plus referenced nodes.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Declared node indices, in declaration order.
    #[inline]
    pub(crate) fn declaration_order(&self) -> &[usize] {
        &self.declared
    }

    pub(crate) fn unknown(&self, id: usize) -> GraphError {
        GraphError::UnknownNode(self.keys[id].clone())
    }
}
/// Normalize an edge to its cost, rejecting negative, NaN and infinite
/// weights.
fn checked_weight(from: &str, to: &str, edge: EdgeValue) -> Result<f64, GraphError> {
    let weight = edge.cost();
    if !weight.is_finite() || weight < 0.0 {
        return Err(GraphError::InvalidWeight {
            from: from.to_string(),
            to: to.to_string(),
            weight,
        });
    }
    Ok(weight)
}

/// Iterator over the outgoing edges of a node, see [`Graph::neighbors`].
#[derive(Debug, Clone)]
pub struct Adjacent<'g> {
    keys: &'g [String],
    edges: std::slice::Iter<'g, Edge>,
}

impl<'g> Iterator for Adjacent<'g> {
    type Item = (&'g str, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.edges.next()?;
        Some((self.keys[e.to].as_str(), e.weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl ExactSizeIterator for Adjacent<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph::from_adjacency([
            ("a", vec![("b", EdgeValue::from(2)), ("c", EdgeRecord { cost: 1.5 }.into())]),
            ("b", vec![("c", EdgeValue::from(0.5))]),
            ("c", vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn nodes_enumerate_in_declaration_order() {
        let g = sample();
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.node_keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn neighbors_normalize_both_edge_shapes() {
        let g = sample();
        let adj: Vec<_> = g.neighbors("a").unwrap().collect();
        assert_eq!(adj, vec![("b", 2.0), ("c", 1.5)]);
        assert_eq!(g.neighbors("c").unwrap().len(), 0);
    }

    #[test]
    fn neighbors_of_unknown_node_fails() {
        let g = sample();
        assert_eq!(
            g.neighbors("zz").unwrap_err(),
            GraphError::UnknownNode("zz".into())
        );
    }

    #[test]
    fn referenced_destination_is_not_a_node() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 1).unwrap();
        assert!(g.has_node("a"));
        assert!(!g.has_node("b"));
        assert_eq!(g.len(), 1);
        assert!(matches!(g.neighbors("b"), Err(GraphError::UnknownNode(k)) if k == "b"));

        // Declaring it later keeps the declaration order.
        g.add_node("b");
        assert!(g.has_node("b"));
        assert_eq!(g.node_keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn readding_an_edge_replaces_weight_in_place() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 4).unwrap();
        g.add_edge("a", "c", 1).unwrap();
        g.add_edge("a", "b", 2).unwrap();
        assert_eq!(g.edge_count(), 2);
        let adj: Vec<_> = g.neighbors("a").unwrap().collect();
        assert_eq!(adj, vec![("b", 2.0), ("c", 1.0)]);
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut g = Graph::new();
        g.add_node("x");
        g.add_edge("x", "y", 3).unwrap();
        g.add_node("x");
        assert_eq!(g.len(), 1);
        assert_eq!(g.weight("x", "y"), Some(3.0));
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut g = Graph::new();
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            let err = g.add_edge("a", "b", w).unwrap_err();
            assert!(matches!(err, GraphError::InvalidWeight { .. }), "{w}");
        }
        assert!(g.add_edge("a", "b", EdgeRecord { cost: -0.5 }).is_err());
        // A rejected edge leaves no trace of either endpoint.
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(!g.has_node("a"));
        assert_eq!(g.node_keys().count(), 0);
    }

    #[test]
    fn zero_weight_is_allowed() {
        let mut g = Graph::new();
        g.add_edge("a", "b", 0).unwrap();
        assert_eq!(g.weight("a", "b"), Some(0.0));
    }

    #[test]
    fn weight_lookup() {
        let g = sample();
        assert_eq!(g.weight("b", "c"), Some(0.5));
        assert_eq!(g.weight("c", "b"), None);
        assert_eq!(g.weight("nope", "b"), None);
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
