/// Errors raised by graph construction and traversals.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// The graph has no nodes, so no traversal can be built over it.
    #[error("graph contains no nodes")]
    InvalidGraph,
    /// A referenced node key is not declared in the graph.
    #[error("graph does not contain node {0:?}")]
    UnknownNode(String),
    /// An edge weight is negative, NaN or infinite.
    #[error("edge {from:?} -> {to:?} has invalid weight {weight}")]
    InvalidWeight {
        from: String,
        to: String,
        weight: f64,
    },
    /// A path cost grew past the largest finite `f64`.
    #[error("distance to node {node:?} overflows")]
    DistanceOverflow { node: String },
}
