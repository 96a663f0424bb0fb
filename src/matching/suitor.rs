use std::sync::{Mutex, PoisonError};

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::graph::{Graph, Incidence, NodeId};
use crate::matching::algorithm::{MatchingAlgorithm, RunState};
use crate::matching::model::{Matching, NONE};
use crate::matching::weights::EdgeWeights;

/// Suitor 1/2-approximation of a maximum weight matching (Manne and
/// Halappanavar).
///
/// Every node proposes to its best neighbour that would accept it, i.e. one
/// whose current suitor it beats. A displaced suitor proposes again. At the
/// fixed point mutual suitors are matched. Proposals are ranked by weight,
/// then by the lower proposer id, which makes the edge order strict and the
/// result independent of the processing order.
///
/// With `sort_suitor` the incidence lists must already be in preference order
/// (heaviest first, ties by ascending neighbour id; see
/// [`Graph::sort_edges_by_weight`]). The scan then stops at the first eligible
/// neighbour and resumes there on the next proposal. The result is the same
/// as without sorting.
#[derive(Debug)]
pub struct SuitorMatcher<'a> {
    graph: &'a Graph,
    weights: EdgeWeights<'a>,
    sort_suitor: bool,
    parallel: bool,
    state: RunState,
}

#[derive(Debug, Clone, Copy)]
struct SuitorSlot {
    suitor: NodeId,
    weight: f64,
}

impl Default for SuitorSlot {
    fn default() -> Self {
        Self {
            suitor: NONE,
            weight: f64::NEG_INFINITY,
        }
    }
}

impl<'a> SuitorMatcher<'a> {
    /// `check_sorted_edges` verifies the incidence order up front when
    /// `sort_suitor` is set.
    pub fn new(graph: &'a Graph, sort_suitor: bool, check_sorted_edges: bool) -> Result<Self> {
        Self::build(graph, EdgeWeights::Graph, sort_suitor, check_sorted_edges)
    }

    /// Match on `scores` (one entry per edge id) instead of the graph weights.
    /// A sorted run expects the incidence lists ordered by these scores.
    pub fn with_edge_scores(
        graph: &'a Graph,
        scores: &'a [f64],
        sort_suitor: bool,
        check_sorted_edges: bool,
    ) -> Result<Self> {
        let weights = EdgeWeights::scores(graph, scores)?;
        Self::build(graph, weights, sort_suitor, check_sorted_edges)
    }

    /// Run the proposal phase on the rayon pool. The sorted scan shortcut is
    /// not used in this mode.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    fn build(
        graph: &'a Graph,
        weights: EdgeWeights<'a>,
        sort_suitor: bool,
        check_sorted_edges: bool,
    ) -> Result<Self> {
        if sort_suitor && check_sorted_edges {
            if let Some(node) = weights.first_unsorted_node(graph) {
                return Err(Error::UnsortedEdges { node });
            }
        }
        Ok(Self {
            graph,
            weights,
            sort_suitor,
            parallel: false,
            state: RunState::default(),
        })
    }

    fn propose_sequential(&self) -> (Vec<NodeId>, usize) {
        let bound = self.graph.upper_node_id_bound();
        let mut slots = vec![SuitorSlot::default(); bound];
        let mut cursor = vec![0usize; bound];
        let mut displaced = 0usize;

        for node in self.graph.nodes() {
            let mut current = node;
            loop {
                let candidate = if self.sort_suitor {
                    self.first_eligible(current, &mut cursor[current], &slots)
                } else {
                    self.best_eligible(current, |target| slots[target])
                };
                let Some((partner, weight)) = candidate else {
                    break;
                };

                let slot = &mut slots[partner];
                let previous = slot.suitor;
                slot.suitor = current;
                slot.weight = weight;
                trace!("{} proposes to {} ({:.6})", current, partner, weight);

                if previous == NONE {
                    break;
                }
                displaced += 1;
                current = previous;
            }
        }

        (slots.into_iter().map(|slot| slot.suitor).collect(), displaced)
    }

    fn propose_parallel(&self) -> (Vec<NodeId>, usize) {
        let bound = self.graph.upper_node_id_bound();
        let slots: Vec<Mutex<SuitorSlot>> = (0..bound)
            .map(|_| Mutex::new(SuitorSlot::default()))
            .collect();
        let nodes: Vec<NodeId> = self.graph.nodes().collect();

        let displaced = nodes
            .par_iter()
            .map(|&node| self.settle_concurrently(node, &slots))
            .sum();

        let suitors = slots
            .into_iter()
            .map(|slot| slot.into_inner().unwrap_or_else(PoisonError::into_inner).suitor)
            .collect();
        (suitors, displaced)
    }

    /// Propose on behalf of `node` and of everyone it displaces. Slots are
    /// locked one at a time; a proposal whose target was taken in the
    /// meantime is recomputed.
    fn settle_concurrently(&self, node: NodeId, slots: &[Mutex<SuitorSlot>]) -> usize {
        let read = |target: NodeId| *slots[target].lock().unwrap_or_else(PoisonError::into_inner);
        let mut displaced = 0;
        let mut current = node;
        loop {
            let Some((partner, weight)) = self.best_eligible(current, read) else {
                return displaced;
            };

            let previous = {
                let mut slot = slots[partner]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if !beats(weight, current, &slot) {
                    continue;
                }
                let previous = slot.suitor;
                slot.suitor = current;
                slot.weight = weight;
                previous
            };
            trace!("{} proposes to {} ({:.6})", current, partner, weight);

            if previous == NONE {
                return displaced;
            }
            displaced += 1;
            current = previous;
        }
    }

    /// Best neighbour of `current` that would accept it: highest weight, ties
    /// to the lowest neighbour id.
    fn best_eligible<F>(&self, current: NodeId, slot_of: F) -> Option<(NodeId, f64)>
    where
        F: Fn(NodeId) -> SuitorSlot,
    {
        let mut best: Option<(NodeId, f64)> = None;
        for entry in self.graph.incidence(current) {
            if entry.target == current {
                continue;
            }
            let weight = self.weights.of(entry);
            let improves = match best {
                None => true,
                Some((partner, heaviest)) => {
                    weight > heaviest || (weight == heaviest && entry.target < partner)
                }
            };
            if improves && beats(weight, current, &slot_of(entry.target)) {
                best = Some((entry.target, weight));
            }
        }
        best
    }

    /// First eligible neighbour at or after `cursor` in a sorted incidence
    /// list. Skipped neighbours never become eligible again, so the cursor
    /// only moves forward.
    fn first_eligible(
        &self,
        current: NodeId,
        cursor: &mut usize,
        slots: &[SuitorSlot],
    ) -> Option<(NodeId, f64)> {
        let incidence: &[Incidence] = self.graph.incidence(current);
        while let Some(entry) = incidence.get(*cursor) {
            *cursor += 1;
            if entry.target == current {
                continue;
            }
            let weight = self.weights.of(entry);
            if beats(weight, current, &slots[entry.target]) {
                return Some((entry.target, weight));
            }
        }
        None
    }

    fn collect_pairs(&self, suitors: &[NodeId]) -> Result<Matching> {
        let mut matching = Matching::new(suitors.len());
        for (u, &v) in suitors.iter().enumerate() {
            if v != NONE && u < v && suitors[v] == u {
                matching.match_nodes(u, v)?;
            }
        }
        Ok(matching)
    }
}

/// Whether a proposal of `weight` from `proposer` beats the one held in `slot`.
#[inline]
fn beats(weight: f64, proposer: NodeId, slot: &SuitorSlot) -> bool {
    weight > slot.weight || (weight == slot.weight && proposer < slot.suitor)
}

impl MatchingAlgorithm for SuitorMatcher<'_> {
    fn name(&self) -> &'static str {
        "SuitorMatcher"
    }

    fn run(&mut self) -> Result<()> {
        self.state.ensure_not_run()?;
        let (suitors, displaced) = if self.parallel {
            self.propose_parallel()
        } else {
            self.propose_sequential()
        };
        let matching = self.collect_pairs(&suitors)?;
        debug!(
            "Suitor matching{}{}: {} pairs after {} displaced proposals",
            if self.sort_suitor { " (sorted)" } else { "" },
            if self.parallel { " (parallel)" } else { "" },
            matching.pairs().count(),
            displaced
        );
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
