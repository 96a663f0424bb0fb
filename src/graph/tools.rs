use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::Result;
use crate::graph::model::{Graph, NodeId};

/// Replace every edge weight with a uniform value in `(0, 1]`. The graph
/// becomes weighted. The same seed always yields the same weights.
pub fn randomize_weights(graph: &mut Graph, seed: u64) -> Result<()> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let edges: Vec<(NodeId, NodeId)> = graph.edges().map(|(u, v, _)| (u, v)).collect();
    for (u, v) in &edges {
        let weight = 1.0 - rng.r#gen::<f64>();
        graph.set_weight(*u, *v, weight)?;
    }
    debug!("Randomized weights of {} edges (seed {})", edges.len(), seed);
    Ok(())
}
