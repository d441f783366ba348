//! Time-respecting path search.
//!
//! A path is time-respecting when every edge on it activates no earlier than
//! the edge before it. Arrival at a node is the `activated_at` of the edge
//! used to reach it; the start node is reached at the departure time
//! (negative infinity unless given).
//!
//! Search is label-setting on `(arrival, hops)`: the node with the smallest
//! label is settled first, so the returned path has the earliest possible
//! arrival at the target. Hop count only orders labels competing for the
//! same node; it is not minimized across all earliest-arrival paths. Because
//! an earlier arrival allows every move a later one allows, settling a node
//! once never hides a later-time solution.

use crate::error::Result;
use crate::graph::TemporalGraph;
use crate::types::{EdgeId, NodeId, Timestamp};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A time-respecting path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalPath {
    /// Nodes from start to end, inclusive
    pub nodes: Vec<NodeId>,
    /// Edges taken, one fewer than `nodes`
    pub edges: Vec<EdgeId>,
    /// Activation time of the last edge, `None` for a zero-hop path
    pub arrival: Option<Timestamp>,
}

impl TemporalPath {
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    arrival: Timestamp,
    hops: usize,
}

struct Search {
    best: Vec<Option<Label>>,
    /// Edge slot used to reach each node
    via: Vec<Option<usize>>,
    settled: Vec<bool>,
}

impl<T> TemporalGraph<T> {
    /// Earliest-arrival time-respecting path from `start` to `end`.
    ///
    /// Returns `Ok(None)` when `end` cannot be reached and `UnknownNode` when
    /// either endpoint is missing. `start == end` yields the single-node path.
    pub fn time_respecting_path(&self, start: &str, end: &str) -> Result<Option<TemporalPath>> {
        self.time_respecting_path_from(start, end, Timestamp::MIN)
    }

    /// Like `time_respecting_path`, but only edges activating at or after
    /// `depart_at` may be used for the first hop.
    pub fn time_respecting_path_from(
        &self,
        start: &str,
        end: &str,
        depart_at: Timestamp,
    ) -> Result<Option<TemporalPath>> {
        let start_slot = self.require_slot(start)?;
        let end_slot = self.require_slot(end)?;

        let search = self.earliest_arrival_search(start_slot, depart_at, Some(end_slot));
        if !search.settled[end_slot] {
            log::debug!("No time-respecting path from {} to {}", start, end);
            return Ok(None);
        }

        let mut nodes = vec![self.node_at(end_slot).id.clone()];
        let mut edges = Vec::new();
        let mut current = end_slot;
        while let Some(edge_slot) = search.via[current] {
            let edge = self.edge_at(edge_slot);
            edges.push(edge.id.clone());
            current = self.node_slot(edge.from.as_str()).unwrap_or(start_slot);
            nodes.push(self.node_at(current).id.clone());
        }
        nodes.reverse();
        edges.reverse();

        let arrival = search.via[end_slot].map(|slot| self.edge_at(slot).activated_at);
        Ok(Some(TemporalPath {
            nodes,
            edges,
            arrival,
        }))
    }

    /// Earliest arrival at every node reachable from `start`.
    ///
    /// `start` itself maps to `None` (reached before any edge).
    pub fn earliest_arrivals(&self, start: &str) -> Result<FxHashMap<NodeId, Option<Timestamp>>> {
        let start_slot = self.require_slot(start)?;
        let search = self.earliest_arrival_search(start_slot, Timestamp::MIN, None);

        Ok(search
            .settled
            .iter()
            .enumerate()
            .filter(|(_, settled)| **settled)
            .map(|(slot, _)| {
                let arrival = search.via[slot].map(|edge| self.edge_at(edge).activated_at);
                (self.node_at(slot).id.clone(), arrival)
            })
            .collect())
    }

    fn earliest_arrival_search(
        &self,
        start: usize,
        depart_at: Timestamp,
        target: Option<usize>,
    ) -> Search {
        let n = self.nodes.len();
        let mut search = Search {
            best: vec![None; n],
            via: vec![None; n],
            settled: vec![false; n],
        };

        // (arrival, hops, push order, node slot); push order keeps ties stable
        let mut queue = BinaryHeap::new();
        let mut pushes = 0usize;
        search.best[start] = Some(Label {
            arrival: depart_at,
            hops: 0,
        });
        queue.push(Reverse((depart_at, 0usize, pushes, start)));

        while let Some(Reverse((arrival, hops, _, node))) = queue.pop() {
            if search.settled[node] {
                continue;
            }
            search.settled[node] = true;

            if Some(node) == target {
                break;
            }

            for &edge_slot in self.out_slots(node) {
                let edge = self.edge_at(edge_slot);
                if edge.activated_at < arrival {
                    continue;
                }

                let next = self.target_slot(edge_slot);
                if search.settled[next] {
                    continue;
                }

                let candidate = Label {
                    arrival: edge.activated_at,
                    hops: hops + 1,
                };
                let improves = match search.best[next] {
                    None => true,
                    Some(best) => (candidate.arrival, candidate.hops) < (best.arrival, best.hops),
                };
                if improves {
                    search.best[next] = Some(candidate);
                    search.via[next] = Some(edge_slot);
                    pushes += 1;
                    queue.push(Reverse((candidate.arrival, candidate.hops, pushes, next)));
                }
            }
        }

        search
    }
}
