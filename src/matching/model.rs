use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::matching::weights::EdgeWeights;
use crate::partition::Partition;

/// Sentinel stored for unmatched nodes.
pub const NONE: NodeId = NodeId::MAX;

/// Node-to-partner map of a matching over a fixed id range.
///
/// The map is kept symmetric: whenever `u` is the mate of `v`, `v` is the
/// mate of `u`. Mutators reject calls that would break this instead of
/// repairing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    mate: Vec<NodeId>,
}

impl Matching {
    /// Empty matching over node ids `0..size`.
    pub fn new(size: usize) -> Self {
        Self {
            mate: vec![NONE; size],
        }
    }

    /// Pair `u` with `v`. Both must be in range, distinct and unmatched.
    pub fn match_nodes(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.ensure_in_range(u)?;
        self.ensure_in_range(v)?;
        if u == v {
            return Err(Error::SelfMatch { node: u });
        }
        for node in [u, v] {
            if let Some(mate) = self.mate(node) {
                return Err(Error::AlreadyMatched { node, mate });
            }
        }
        self.mate[u] = v;
        self.mate[v] = u;
        Ok(())
    }

    /// Dissolve the pair `(u, v)`.
    pub fn unmatch(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.ensure_in_range(u)?;
        self.ensure_in_range(v)?;
        if !self.are_matched(u, v) {
            return Err(Error::NotMatched { u, v });
        }
        self.mate[u] = NONE;
        self.mate[v] = NONE;
        Ok(())
    }

    /// Ids outside the matching's range count as unmatched.
    pub fn is_matched(&self, u: NodeId) -> bool {
        self.mate(u).is_some()
    }

    pub fn are_matched(&self, u: NodeId, v: NodeId) -> bool {
        self.mate(u) == Some(v)
    }

    pub fn mate(&self, u: NodeId) -> Option<NodeId> {
        self.mate.get(u).copied().filter(|&mate| mate != NONE)
    }

    /// Fixed number of node slots.
    pub fn len(&self) -> usize {
        self.mate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mate.is_empty()
    }

    /// Number of matched pairs among the nodes of `graph`.
    pub fn size(&self, graph: &Graph) -> usize {
        let matched = (0..graph.upper_node_id_bound())
            .into_par_iter()
            .filter(|&u| graph.has_node(u) && self.is_matched(u))
            .count();
        matched / 2
    }

    /// Total graph weight of the matched pairs.
    pub fn weight(&self, graph: &Graph) -> f64 {
        self.weight_with(graph, &EdgeWeights::Graph)
    }

    /// Total weight of the matched pairs under `weights`. Summed in node
    /// order so repeated calls agree bit for bit.
    pub fn weight_with(&self, graph: &Graph, weights: &EdgeWeights<'_>) -> f64 {
        self.pairs()
            .map(|(u, v)| weights.between(graph, u, v))
            .sum()
    }

    /// Whether every matched pair is a symmetric pair of existing nodes joined
    /// by an edge of `graph`.
    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.mate.par_iter().enumerate().all(|(u, &v)| {
            v == NONE
                || (u != v
                    && graph.has_node(u)
                    && graph.has_node(v)
                    && self.mate.get(v) == Some(&u)
                    && graph.has_edge(u, v))
        })
    }

    /// Snapshot of the mate of every node slot.
    pub fn get_vector(&self) -> Vec<Option<NodeId>> {
        (0..self.mate.len()).map(|u| self.mate(u)).collect()
    }

    /// Matched pairs `(u, v)` with `u < v`, ascending by `u`.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.mate
            .iter()
            .enumerate()
            .filter(|&(u, &v)| v != NONE && u < v)
            .map(|(u, &v)| (u, v))
    }

    /// Partition of the nodes of `graph`: one subset per matched pair, a
    /// singleton for every other node.
    pub fn to_partition(&self, graph: &Graph) -> Partition {
        let mut partition = Partition::new(graph.upper_node_id_bound());
        for u in graph.nodes() {
            partition.insert(u);
        }
        for (u, v) in self.pairs() {
            partition.merge(u, v);
        }
        partition
    }

    fn ensure_in_range(&self, node: NodeId) -> Result<()> {
        if node < self.mate.len() {
            Ok(())
        } else {
            Err(Error::NodeOutOfRange {
                node,
                size: self.mate.len(),
            })
        }
    }
}

impl Serialize for Matching {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq((0..self.mate.len()).map(|u| self.mate(u)))
    }
}
