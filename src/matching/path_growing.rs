use log::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::matching::algorithm::{MatchingAlgorithm, RunState};
use crate::matching::model::Matching;
use crate::matching::weights::EdgeWeights;

/// Path growing 1/2-approximation of a maximum weight matching
/// (Drake and Hougardy).
///
/// Paths are grown greedily along the heaviest remaining edge while their
/// edges are coloured alternately into two matchings; the heavier of the two
/// is returned. Visited nodes are removed from a working view of the graph,
/// so a walk that closes a cycle simply drops the closing edge.
#[derive(Debug)]
pub struct PathGrowingMatcher<'a> {
    graph: &'a Graph,
    weights: EdgeWeights<'a>,
    state: RunState,
}

impl<'a> PathGrowingMatcher<'a> {
    pub fn new(graph: &'a Graph) -> Result<Self> {
        Self::build(graph, EdgeWeights::Graph)
    }

    /// Match on `scores` (one entry per edge id) instead of the graph weights.
    pub fn with_edge_scores(graph: &'a Graph, scores: &'a [f64]) -> Result<Self> {
        let weights = EdgeWeights::scores(graph, scores)?;
        Self::build(graph, weights)
    }

    fn build(graph: &'a Graph, weights: EdgeWeights<'a>) -> Result<Self> {
        let count = graph.self_loop_count();
        if count > 0 {
            return Err(Error::SelfLoops { count });
        }
        Ok(Self {
            graph,
            weights,
            state: RunState::default(),
        })
    }

    fn grow_paths(&self) -> Result<Matching> {
        let bound = self.graph.upper_node_id_bound();
        let mut remaining: Vec<usize> = (0..bound).map(|u| self.graph.degree(u)).collect();
        let mut removed = vec![false; bound];
        let mut first = Matching::new(bound);
        let mut second = Matching::new(bound);
        let mut paths = 0usize;

        for start in 0..bound {
            if removed[start] || remaining[start] == 0 {
                continue;
            }
            paths += 1;
            let mut current = start;
            let mut into_first = true;

            while remaining[current] > 0 {
                let Some(next) = self.heaviest_neighbor(current, &removed) else {
                    break;
                };
                trace!(
                    "Path {}: edge ({}, {}) into matching {}",
                    paths,
                    current,
                    next,
                    if into_first { 1 } else { 2 }
                );
                if into_first {
                    first.match_nodes(current, next)?;
                } else {
                    second.match_nodes(current, next)?;
                }
                into_first = !into_first;

                removed[current] = true;
                remaining[current] = 0;
                for entry in self.graph.incidence(current) {
                    if !removed[entry.target] {
                        remaining[entry.target] -= 1;
                    }
                }
                current = next;
            }
            removed[current] = true;
        }

        let first_weight = first.weight_with(self.graph, &self.weights);
        let second_weight = second.weight_with(self.graph, &self.weights);
        debug!(
            "Path growing: {} paths, candidate weights {:.6} / {:.6}",
            paths, first_weight, second_weight
        );
        Ok(if first_weight >= second_weight {
            first
        } else {
            second
        })
    }

    /// Heaviest edge from `node` to a node still in the working graph; ties go
    /// to the lowest neighbour id.
    fn heaviest_neighbor(&self, node: NodeId, removed: &[bool]) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for entry in self.graph.incidence(node) {
            if removed[entry.target] {
                continue;
            }
            let weight = self.weights.of(entry);
            let better = match best {
                None => true,
                Some((target, heaviest)) => {
                    weight > heaviest || (weight == heaviest && entry.target < target)
                }
            };
            if better {
                best = Some((entry.target, weight));
            }
        }
        best.map(|(target, _)| target)
    }
}

impl MatchingAlgorithm for PathGrowingMatcher<'_> {
    fn name(&self) -> &'static str {
        "PathGrowingMatcher"
    }

    fn run(&mut self) -> Result<()> {
        self.state.ensure_not_run()?;
        let matching = self.grow_paths()?;
        self.state.finish(matching);
        Ok(())
    }

    fn has_finished(&self) -> bool {
        self.state.has_finished()
    }

    fn matching(&self) -> Result<&Matching> {
        self.state.matching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_with_tail() -> Graph {
        let mut graph = Graph::new(5, false);
        graph.add_edge(0, 1).expect("edge");
        graph.add_edge(2, 1).expect("edge");
        graph.add_edge(3, 1).expect("edge");
        graph.add_edge(2, 4).expect("edge");
        graph
    }

    #[test]
    fn edge_scores_drive_the_walk() {
        let mut graph = star_with_tail();
        graph.index_edges();
        let scores = [0.5, 1.5, 1.0, 2.0];

        let mut matcher = PathGrowingMatcher::with_edge_scores(&graph, &scores).expect("matcher");
        matcher.run().expect("run");
        let matching = matcher.get_matching().expect("matching");

        assert_eq!(matching.get_vector().len(), 5);
        assert_eq!(
            matching.get_vector(),
            vec![Some(1), Some(0), Some(4), None, Some(2)]
        );
        assert!(matching.is_proper(&graph));
    }

    #[test]
    fn keeps_the_heavier_colour_class() {
        let mut graph = Graph::new(4, true);
        graph.add_weighted_edge(0, 1, 1.0).expect("edge");
        graph.add_weighted_edge(1, 2, 10.0).expect("edge");
        graph.add_weighted_edge(2, 3, 1.0).expect("edge");

        let mut matcher = PathGrowingMatcher::new(&graph).expect("matcher");
        matcher.run().expect("run");
        let matching = matcher.matching().expect("matching");
        assert!(matching.are_matched(1, 2));
        assert_eq!(matching.size(&graph), 1);
        assert_eq!(matching.weight(&graph), 10.0);
    }

    #[test]
    fn cycle_closing_edge_is_dropped() {
        let mut graph = Graph::new(3, false);
        graph.add_edge(0, 1).expect("edge");
        graph.add_edge(1, 2).expect("edge");
        graph.add_edge(2, 0).expect("edge");

        let mut matcher = PathGrowingMatcher::new(&graph).expect("matcher");
        matcher.run().expect("run");
        let matching = matcher.matching().expect("matching");
        assert_eq!(matching.get_vector(), vec![Some(1), Some(0), None]);
    }

    #[test]
    fn isolated_and_deleted_nodes_stay_unmatched() {
        let mut graph = Graph::new(5, false);
        graph.add_edge(0, 1).expect("edge");
        graph.add_edge(3, 4).expect("edge");
        graph.remove_node(4).expect("remove");

        let mut matcher = PathGrowingMatcher::new(&graph).expect("matcher");
        matcher.run().expect("run");
        let matching = matcher.matching().expect("matching");
        assert_eq!(matching.len(), 5);
        assert!(matching.are_matched(0, 1));
        assert!(!matching.is_matched(2));
        assert!(!matching.is_matched(3));
    }

    #[test]
    fn run_is_allowed_once() {
        let graph = star_with_tail();
        let mut matcher = PathGrowingMatcher::new(&graph).expect("matcher");
        assert_eq!(matcher.matching().unwrap_err(), Error::NotRun);
        assert!(!matcher.has_finished());

        matcher.run().expect("run");
        let first = matcher.get_matching().expect("matching");
        assert_eq!(matcher.run(), Err(Error::AlreadyRun));
        assert!(matcher.has_finished());
        assert_eq!(matcher.get_matching().expect("matching"), first);
    }

    #[test]
    fn construction_errors() {
        let mut graph = star_with_tail();
        assert_eq!(
            PathGrowingMatcher::with_edge_scores(&graph, &[1.0; 4]).unwrap_err(),
            Error::EdgesNotIndexed
        );
        graph.index_edges();
        assert_eq!(
            PathGrowingMatcher::with_edge_scores(&graph, &[1.0; 3]).unwrap_err(),
            Error::ScoreLengthMismatch {
                expected: 4,
                got: 3
            }
        );

        graph.add_edge(4, 4).expect("loop");
        assert_eq!(
            PathGrowingMatcher::new(&graph).unwrap_err(),
            Error::SelfLoops { count: 1 }
        );
    }
}
