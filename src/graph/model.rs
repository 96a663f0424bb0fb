use std::cmp::Ordering;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::{EdgeIndexable, EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type NodeId = usize;
pub type EdgeId = usize;
pub type GraphId = String;

/// Weight reported for every edge of an unweighted graph.
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub graph_attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: GraphId,
    pub target: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

/// One entry of a node's incidence list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incidence {
    pub target: NodeId,
    pub weight: f64,
    pub edge: EdgeId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum IncidenceOrder {
    #[default]
    Insertion,
    ByWeight {
        decreasing: bool,
    },
}

/// Undirected graph stored in a petgraph `StableUnGraph`.
///
/// Node and edge ids are petgraph indices; removing a node leaves a vacant
/// slot which a later `add_node` may fill again. Parallel edges are rejected.
/// Per-node incidence lists are a view derived from the edge set, rebuilt
/// lazily after every mutation.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: StableUnGraph<(), f64>,
    node_slots: usize,
    weighted: bool,
    edges_indexed: bool,
    order: IncidenceOrder,
    incidence: OnceCell<Vec<Vec<Incidence>>>,
}

impl Graph {
    pub fn new(nodes: usize, weighted: bool) -> Self {
        let mut inner = StableUnGraph::with_capacity(nodes, 0);
        for _ in 0..nodes {
            inner.add_node(());
        }
        Self {
            inner,
            node_slots: nodes,
            weighted,
            ..Self::default()
        }
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = self.inner.add_node(()).index();
        self.node_slots = self.node_slots.max(id + 1);
        self.invalidate();
        id
    }

    /// Delete a node together with its incident edges.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        let index = self.ensure_node(node)?;
        self.inner.remove_node(index);
        self.invalidate();
        Ok(())
    }

    /// Insert an edge with the default weight.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.add_weighted_edge(u, v, DEFAULT_WEIGHT)
    }

    /// Insert an edge. On an unweighted graph the weight is ignored.
    pub fn add_weighted_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        let a = self.ensure_node(u)?;
        let b = self.ensure_node(v)?;
        let weight = checked_weight(u, v, weight)?;
        if self.inner.find_edge(a, b).is_some() {
            return Err(Error::ParallelEdge { u, v });
        }
        let weight = if self.weighted { weight } else { DEFAULT_WEIGHT };
        self.inner.add_edge(a, b, weight);
        self.invalidate();
        Ok(())
    }

    /// Overwrite the weight of edge `(u, v)`, inserting it when absent. The
    /// graph becomes weighted.
    pub fn set_weight(&mut self, u: NodeId, v: NodeId, weight: f64) -> Result<()> {
        let a = self.ensure_node(u)?;
        let b = self.ensure_node(v)?;
        let weight = checked_weight(u, v, weight)?;
        self.weighted = true;
        match self.inner.find_edge(a, b) {
            Some(edge) => {
                self.inner[edge] = weight;
                self.invalidate();
                Ok(())
            }
            None => self.add_weighted_edge(u, v, weight),
        }
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.index_of(node).is_some()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.find_edge(u, v).is_some()
    }

    /// Weight of edge `(u, v)`, or `0.0` when there is no such edge.
    pub fn weight(&self, u: NodeId, v: NodeId) -> f64 {
        self.find_edge(u, v)
            .map(|edge| self.inner[edge])
            .unwrap_or(0.0)
    }

    /// Id of edge `(u, v)`; `None` until [`Graph::index_edges`] was called.
    pub fn edge_id(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        if !self.edges_indexed {
            return None;
        }
        self.find_edge(u, v).map(|edge| edge.index())
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.incidence(node).len()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn self_loop_count(&self) -> usize {
        self.inner
            .edge_references()
            .filter(|edge| edge.source() == edge.target())
            .count()
    }

    /// One past the largest node id ever handed out, vacant slots included.
    pub fn upper_node_id_bound(&self) -> usize {
        self.node_slots
    }

    /// One past the largest edge id in use.
    pub fn upper_edge_id_bound(&self) -> usize {
        self.inner.edge_bound()
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn has_edge_ids(&self) -> bool {
        self.edges_indexed
    }

    /// Publish edge ids. An edge keeps its petgraph index as id, so ids follow
    /// insertion order and stay stable while the edge exists.
    pub fn index_edges(&mut self) {
        self.edges_indexed = true;
    }

    /// Order every incidence list by weight, breaking ties by ascending
    /// neighbour id. The order survives later mutations.
    pub fn sort_edges_by_weight(&mut self, decreasing: bool) {
        self.order = IncidenceOrder::ByWeight { decreasing };
        self.invalidate();
    }

    /// Stable-sort every incidence list with a custom comparator. Unlike
    /// [`Graph::sort_edges_by_weight`] the order is dropped by the next
    /// mutation.
    pub fn sort_incidence_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Incidence, &Incidence) -> Ordering,
    {
        let mut lists = self
            .incidence
            .take()
            .unwrap_or_else(|| self.build_incidence());
        for list in &mut lists {
            list.sort_by(&mut compare);
        }
        self.incidence = OnceCell::with_value(lists);
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices().map(|node| node.index())
    }

    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incidence(node).iter().map(|e| e.target)
    }

    /// Incidence list of `node`; empty for deleted or unknown ids.
    pub fn incidence(&self, node: NodeId) -> &[Incidence] {
        self.incidence
            .get_or_init(|| self.build_incidence())
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every undirected edge exactly once, in edge id order, as
    /// `(u, v, weight)` with `v <= u`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.inner.edge_references().map(|edge| {
            let (a, b) = (edge.source().index(), edge.target().index());
            (a.max(b), a.min(b), *edge.weight())
        })
    }

    /// The underlying petgraph store.
    pub fn petgraph(&self) -> &StableUnGraph<(), f64> {
        &self.inner
    }

    fn build_incidence(&self) -> Vec<Vec<Incidence>> {
        let mut lists = vec![Vec::new(); self.node_slots];
        for edge in self.inner.edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            let entry = |target| Incidence {
                target,
                weight: *edge.weight(),
                edge: edge.id().index(),
            };
            lists[u].push(entry(v));
            if u != v {
                lists[v].push(entry(u));
            }
        }
        if let IncidenceOrder::ByWeight { decreasing } = self.order {
            for list in &mut lists {
                list.sort_by(|a, b| {
                    let by_weight = compare_weights(a.weight, b.weight);
                    let by_weight = if decreasing {
                        by_weight.reverse()
                    } else {
                        by_weight
                    };
                    by_weight.then(a.target.cmp(&b.target))
                });
            }
        }
        lists
    }

    fn invalidate(&mut self) {
        self.incidence.take();
    }

    fn index_of(&self, node: NodeId) -> Option<NodeIndex> {
        if node >= self.node_slots {
            return None;
        }
        let index = NodeIndex::new(node);
        self.inner.node_weight(index).map(|_| index)
    }

    fn find_edge(&self, u: NodeId, v: NodeId) -> Option<petgraph::graph::EdgeIndex> {
        self.inner.find_edge(self.index_of(u)?, self.index_of(v)?)
    }

    fn ensure_node(&self, node: NodeId) -> Result<NodeIndex> {
        self.index_of(node).ok_or(Error::InvalidNode { node })
    }
}

/// Total order on finite weights in which `-0.0` and `0.0` are equal.
pub fn compare_weights(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Reject non-finite weights and fold `-0.0` into `0.0`.
fn checked_weight(u: NodeId, v: NodeId, weight: f64) -> Result<f64> {
    if weight.is_finite() {
        Ok(weight + 0.0)
    } else {
        Err(Error::NonFiniteWeight { u, v })
    }
}

/// A graph together with the external identifiers it was loaded from.
#[derive(Debug, Clone)]
pub struct GraphInstance {
    pub graph: Graph,
    pub node_lookup: IndexMap<GraphId, NodeId>,
    pub graph_attributes: IndexMap<String, serde_json::Value>,
}

impl GraphInstance {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_id(&self, external: &str) -> Option<NodeId> {
        self.node_lookup.get(external).copied()
    }

    /// External identifier of a dense node id. Ids are assigned in load order,
    /// so the lookup position is the node id.
    pub fn external_id(&self, node: NodeId) -> Option<&GraphId> {
        self.node_lookup.get_index(node).map(|(id, _)| id)
    }
}
