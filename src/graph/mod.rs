pub mod construction;
pub mod model;
pub mod tools;

pub use construction::GraphLoader;
pub use model::{
    DEFAULT_WEIGHT, EdgeId, Graph, GraphId, GraphInstance, Incidence, NodeId, RawEdge, RawGraph,
    RawNode, compare_weights,
};
pub use tools::randomize_weights;
