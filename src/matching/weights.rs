use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::graph::{Graph, Incidence, NodeId, compare_weights};

/// Where the matchers read edge weights from.
#[derive(Debug, Clone, Copy)]
pub enum EdgeWeights<'a> {
    /// The weights stored in the graph.
    Graph,
    /// An external score per edge id.
    Scores(&'a [f64]),
}

impl<'a> EdgeWeights<'a> {
    /// Validate `scores` against the edge ids of `graph`.
    pub fn scores(graph: &Graph, scores: &'a [f64]) -> Result<Self> {
        if !graph.has_edge_ids() {
            return Err(Error::EdgesNotIndexed);
        }
        let expected = graph.upper_edge_id_bound();
        if scores.len() != expected {
            return Err(Error::ScoreLengthMismatch {
                expected,
                got: scores.len(),
            });
        }
        if let Some(edge) = scores.iter().position(|score| !score.is_finite()) {
            return Err(Error::NonFiniteScore { edge });
        }
        Ok(Self::Scores(scores))
    }

    #[inline]
    pub fn of(&self, entry: &Incidence) -> f64 {
        match self {
            Self::Graph => entry.weight,
            Self::Scores(scores) => scores.get(entry.edge).copied().unwrap_or(0.0),
        }
    }

    /// Weight of edge `(u, v)`, or `0.0` when there is no such edge.
    pub fn between(&self, graph: &Graph, u: NodeId, v: NodeId) -> f64 {
        graph
            .incidence(u)
            .iter()
            .find(|entry| entry.target == v)
            .map(|entry| self.of(entry))
            .unwrap_or(0.0)
    }

    /// Preference order of two entries of the same incidence list: heavier
    /// first, then the lower neighbour id. `-0.0` ties with `0.0`, as in the
    /// suitor proposal ranking.
    pub fn preference(&self, a: &Incidence, b: &Incidence) -> Ordering {
        compare_weights(self.of(b), self.of(a)).then(a.target.cmp(&b.target))
    }

    /// First node whose incidence list is not in preference order.
    pub fn first_unsorted_node(&self, graph: &Graph) -> Option<NodeId> {
        graph.nodes().find(|&node| {
            graph
                .incidence(node)
                .windows(2)
                .any(|pair| self.preference(&pair[0], &pair[1]) == Ordering::Greater)
        })
    }
}
