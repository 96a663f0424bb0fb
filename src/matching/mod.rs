pub mod algorithm;
pub mod model;
pub mod path_growing;
pub mod suitor;
pub mod weights;

pub use algorithm::MatchingAlgorithm;
pub use model::{Matching, NONE};
pub use path_growing::PathGrowingMatcher;
pub use suitor::SuitorMatcher;
pub use weights::EdgeWeights;
