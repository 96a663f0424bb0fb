use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use log::debug;
use petgraph::Undirected;
use petgraph::graph::IndexType;
use petgraph::visit::EdgeRef;

use crate::graph::model::{DEFAULT_WEIGHT, Graph, GraphInstance, NodeId, RawGraph};

/// High-level loader responsible for turning JSON representations into in-memory graphs.
#[derive(Debug, Default)]
pub struct GraphLoader;

impl GraphLoader {
    /// Parse a JSON string into a graph instance.
    pub fn from_json_str(json: &str) -> Result<GraphInstance> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Self::from_raw_graph(raw)
    }

    /// Read JSON graph data from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<GraphInstance> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(&buf)
    }

    pub fn from_path(path: &Path) -> Result<GraphInstance> {
        let file = File::open(path).with_context(|| format!("open graph file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("parse graph file {:?}", path))
    }

    /// Import an undirected petgraph graph. Node indices become node ids and
    /// `weight` maps each edge payload to its matching weight. Parallel edges
    /// are rejected.
    pub fn from_petgraph<N, E, Ix, F>(
        source: &petgraph::Graph<N, E, Undirected, Ix>,
        weight: F,
    ) -> crate::Result<Graph>
    where
        Ix: IndexType,
        F: Fn(&E) -> f64,
    {
        let mut graph = Graph::new(source.node_count(), true);
        for edge in source.edge_references() {
            graph.add_weighted_edge(
                edge.source().index(),
                edge.target().index(),
                weight(edge.weight()),
            )?;
        }
        Ok(graph)
    }

    fn from_raw_graph(raw: RawGraph) -> Result<GraphInstance> {
        if raw.directed {
            bail!("Directed graphs are not supported");
        }

        let mut node_lookup: IndexMap<String, NodeId> = IndexMap::with_capacity(raw.nodes.len());
        for raw_node in raw.nodes {
            let next = node_lookup.len();
            if node_lookup.insert(raw_node.id.clone(), next).is_some() {
                bail!("Duplicate node id: {}", raw_node.id);
            }
        }

        let mut edges = Vec::with_capacity(raw.edges.len());
        for mut raw_edge in raw.edges {
            let source = *node_lookup
                .get(&raw_edge.source)
                .ok_or_else(|| anyhow!("Unknown source node id: {}", raw_edge.source))?;
            let target = *node_lookup
                .get(&raw_edge.target)
                .ok_or_else(|| anyhow!("Unknown target node id: {}", raw_edge.target))?;
            let weight = extract_weight(&mut raw_edge.attributes);
            edges.push((source, target, weight));
        }

        let weighted = edges.iter().any(|(_, _, weight)| weight.is_some());
        let mut graph = Graph::new(node_lookup.len(), weighted);
        for (source, target, weight) in edges {
            graph
                .add_weighted_edge(source, target, weight.unwrap_or(DEFAULT_WEIGHT))
                .with_context(|| format!("insert edge ({}, {})", source, target))?;
        }
        debug!(
            "Loaded graph with {} nodes, {} edges (weighted: {})",
            graph.node_count(),
            graph.edge_count(),
            weighted
        );

        Ok(GraphInstance {
            graph,
            node_lookup,
            graph_attributes: raw.graph_attributes,
        })
    }
}

fn extract_weight(attrs: &mut IndexMap<String, serde_json::Value>) -> Option<f64> {
    attrs.shift_remove("weight").and_then(|value| match value {
        serde_json::Value::Number(num) => num.as_f64(),
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => None,
    })
}
