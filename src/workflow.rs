use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use log::info;
use serde::Serialize;

use crate::graph::{Graph, NodeId, randomize_weights};
use crate::matching::{Matching, MatchingAlgorithm, PathGrowingMatcher, SuitorMatcher};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    #[default]
    Suitor,
    PathGrowing,
}

impl FromStr for AlgorithmKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "suitor" => Ok(Self::Suitor),
            "path-growing" | "pgm" => Ok(Self::PathGrowing),
            other => bail!("Unknown algorithm '{other}' (expected 'suitor' or 'path-growing')"),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suitor => f.write_str("suitor"),
            Self::PathGrowing => f.write_str("path-growing"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub algorithm: AlgorithmKind,
    /// Sort incidence lists by decreasing weight before matching; the suitor
    /// matcher then uses its sorted scan.
    pub sort_edges: bool,
    pub check_sorted_edges: bool,
    pub parallel: bool,
    pub randomize_seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::Suitor,
            sort_edges: false,
            check_sorted_edges: true,
            parallel: false,
            randomize_seed: None,
        }
    }
}

impl RunConfig {
    /// Construct the configured matcher over `graph`.
    pub fn build<'a>(&self, graph: &'a Graph) -> crate::Result<Box<dyn MatchingAlgorithm + 'a>> {
        Ok(match self.algorithm {
            AlgorithmKind::Suitor => Box::new(
                SuitorMatcher::new(graph, self.sort_edges, self.check_sorted_edges)?
                    .parallel(self.parallel),
            ),
            AlgorithmKind::PathGrowing => Box::new(PathGrowingMatcher::new(graph)?),
        })
    }
}

/// Prepare a graph according to a [`RunConfig`] and run one matcher on it.
pub struct MatchingWorkflow {
    config: RunConfig,
}

impl MatchingWorkflow {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn execute(&self, graph: &mut Graph) -> Result<MatchingSummary> {
        if let Some(seed) = self.config.randomize_seed {
            randomize_weights(graph, seed)?;
        }
        if self.config.sort_edges {
            graph.sort_edges_by_weight(true);
        }
        let graph: &Graph = graph;

        let start = Instant::now();
        let mut algorithm = self.config.build(graph)?;
        algorithm.run()?;
        let duration = start.elapsed();

        let matching = algorithm.get_matching()?;
        let report = MatchingReport::new(algorithm.name(), graph, &matching);
        info!(
            "{} finished in {:?}: {} pairs, weight {:.6}",
            report.algorithm, duration, report.size, report.weight
        );
        Ok(MatchingSummary {
            report,
            matching,
            duration,
        })
    }
}

/// Serializable digest of a matching.
#[derive(Debug, Clone, Serialize)]
pub struct MatchingReport {
    pub algorithm: String,
    pub nodes: usize,
    pub edges: usize,
    pub size: usize,
    pub weight: f64,
    pub proper: bool,
    pub mates: Vec<Option<NodeId>>,
}

impl MatchingReport {
    pub fn new(algorithm: &str, graph: &Graph, matching: &Matching) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            size: matching.size(graph),
            weight: matching.weight(graph),
            proper: matching.is_proper(graph),
            mates: matching.get_vector(),
        }
    }
}

pub struct MatchingSummary {
    pub report: MatchingReport,
    pub matching: Matching,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_pendant() -> Graph {
        let mut graph = Graph::new(4, true);
        graph.add_weighted_edge(0, 1, 1.0).expect("edge");
        graph.add_weighted_edge(1, 2, 4.0).expect("edge");
        graph.add_weighted_edge(2, 0, 2.0).expect("edge");
        graph.add_weighted_edge(2, 3, 3.0).expect("edge");
        graph
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("suitor".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Suitor);
        assert_eq!(
            "path-growing".parse::<AlgorithmKind>().unwrap(),
            AlgorithmKind::PathGrowing
        );
        assert!("blossom".parse::<AlgorithmKind>().is_err());
        assert_eq!(AlgorithmKind::PathGrowing.to_string(), "path-growing");
    }

    #[test]
    fn sorted_workflow_reports_suitor_result() {
        let mut graph = triangle_with_pendant();
        let config = RunConfig {
            sort_edges: true,
            ..RunConfig::default()
        };
        let summary = MatchingWorkflow::new(config).execute(&mut graph).expect("execute");

        assert_eq!(summary.report.algorithm, "SuitorMatcher");
        assert_eq!(summary.report.size, 1);
        assert_eq!(summary.report.weight, 4.0);
        assert!(summary.report.proper);
        assert_eq!(summary.report.mates, vec![None, Some(2), Some(1), None]);
        assert_eq!(summary.matching.get_vector(), summary.report.mates);
    }

    #[test]
    fn path_growing_workflow_with_random_weights() {
        let mut graph = triangle_with_pendant();
        let config = RunConfig {
            algorithm: AlgorithmKind::PathGrowing,
            randomize_seed: Some(3),
            ..RunConfig::default()
        };
        let summary = MatchingWorkflow::new(config).execute(&mut graph).expect("execute");
        assert_eq!(summary.report.algorithm, "PathGrowingMatcher");
        assert!(summary.report.proper);
        assert!(summary.report.size >= 1);

        let json = serde_json::to_value(&summary.report).expect("serialize");
        assert_eq!(json["mates"].as_array().map(Vec::len), Some(4));
    }
}
