//! Error type shared by the graph store, the matching container and the matchers.

use thiserror::Error;

use crate::graph::NodeId;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Usage errors. Algorithmic edge cases (isolated nodes, empty graphs, zero
/// weights) are never reported here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Node id does not fit into the matching's fixed size
    #[error("Node {node} is out of range for a matching over {size} nodes")]
    NodeOutOfRange { node: NodeId, size: usize },

    /// Attempt to match a node with itself
    #[error("Cannot match node {node} with itself")]
    SelfMatch { node: NodeId },

    /// Attempt to match a node that already has a partner
    #[error("Node {node} is already matched to {mate}")]
    AlreadyMatched { node: NodeId, mate: NodeId },

    /// Attempt to unmatch a pair that is not matched
    #[error("Nodes {u} and {v} are not matched to each other")]
    NotMatched { u: NodeId, v: NodeId },

    /// Edge scores supplied for a graph without edge ids
    #[error("Edges must be indexed before edge scores can be used")]
    EdgesNotIndexed,

    /// Edge score array does not cover the indexed edges
    #[error("Edge score array has {got} entries, but the graph has {expected} indexed edges")]
    ScoreLengthMismatch { expected: usize, got: usize },

    /// Edge score is NaN or infinite
    #[error("Edge score for edge {edge} is not finite")]
    NonFiniteScore { edge: usize },

    /// Sorted suitor matching requested on unsorted incidence lists
    #[error("Incidence list of node {node} is not sorted by decreasing weight")]
    UnsortedEdges { node: NodeId },

    /// Path growing does not support self-loops
    #[error("Graph contains {count} self-loop(s), which path growing does not support")]
    SelfLoops { count: usize },

    #[error("Algorithm has already been run")]
    AlreadyRun,

    #[error("Algorithm has not been run yet")]
    NotRun,

    /// Graph mutation on a deleted or unknown node
    #[error("Node {node} does not exist in the graph")]
    InvalidNode { node: NodeId },

    /// Second edge between the same pair of nodes
    #[error("Edge ({u}, {v}) already exists")]
    ParallelEdge { u: NodeId, v: NodeId },

    /// Graph mutation with a NaN or infinite weight
    #[error("Weight of edge ({u}, {v}) is not finite")]
    NonFiniteWeight { u: NodeId, v: NodeId },
}
