pub mod error;
pub mod graph;
pub mod matching;
pub mod partition;
pub mod workflow;

pub use error::{Error, Result};
pub use graph::{EdgeId, Graph, GraphId, GraphInstance, GraphLoader, NodeId, randomize_weights};
pub use matching::{
    EdgeWeights, Matching, MatchingAlgorithm, NONE, PathGrowingMatcher, SuitorMatcher,
};
pub use partition::Partition;
pub use workflow::{AlgorithmKind, MatchingReport, MatchingSummary, MatchingWorkflow, RunConfig};
