//! Interval queries over edge activation intervals.
//!
//! Every bound is inclusive and an edge without `deactivated_at` is treated
//! as active forever. Results are returned in edge insertion order whether
//! or not the `time-index` feature narrows the scan.

use crate::error::{GraphError, Result};
use crate::graph::TemporalGraph;
use crate::types::{NodeId, Snapshot, TemporalEdge, TimeWindow, Timestamp};

impl<T> TemporalGraph<T> {
    /// Edges with `activated_at <= time <= deactivated_at`.
    pub fn active_at(&self, time: Timestamp) -> Vec<&TemporalEdge> {
        self.slots_activated_by(time)
            .into_iter()
            .map(|slot| self.edge_at(slot))
            .filter(|edge| edge.is_active_at(time))
            .collect()
    }

    /// Edges whose activation interval intersects `[t0, t1]`.
    ///
    /// Touching endpoints count as overlap. `t0 > t1` is an empty window and
    /// returns no edges rather than an error.
    pub fn edges_overlapping(&self, t0: Timestamp, t1: Timestamp) -> Vec<&TemporalEdge> {
        if t0 > t1 {
            return Vec::new();
        }

        self.slots_activated_by(t1)
            .into_iter()
            .map(|slot| self.edge_at(slot))
            .filter(|edge| edge.overlaps(t0, t1))
            .collect()
    }

    /// Every edge indexed under `node`, regardless of time.
    ///
    /// Edges come back in the order they were added. Filtering by time is up
    /// to the caller; see `active_outgoing`.
    pub fn outgoing(&self, node: &str) -> Result<Vec<&TemporalEdge>> {
        let slot = self.require_slot(node)?;
        Ok(self
            .out_slots(slot)
            .iter()
            .map(|&edge_slot| self.edge_at(edge_slot))
            .collect())
    }

    /// Outgoing edges of `node` that are active at `time`, in insertion order.
    pub fn active_outgoing(&self, node: &str, time: Timestamp) -> Result<Vec<&TemporalEdge>> {
        Ok(self
            .outgoing(node)?
            .into_iter()
            .filter(|edge| edge.is_active_at(time))
            .collect())
    }

    /// Edges pointing at `node`, regardless of time.
    ///
    /// There is no reverse index, so this scans every edge.
    pub fn incoming(&self, node: &str) -> Result<Vec<&TemporalEdge>> {
        let slot = self.require_slot(node)?;
        Ok(self
            .edges
            .iter()
            .enumerate()
            .filter(|(edge_slot, _)| self.target_slot(*edge_slot) == slot)
            .map(|(_, edge)| edge)
            .collect())
    }

    /// Every node plus the edges active at `time`.
    pub fn snapshot_at(&self, time: Timestamp) -> Snapshot {
        Snapshot {
            time,
            nodes: self.nodes.iter().map(|node| node.id.clone()).collect(),
            edges: self
                .active_at(time)
                .into_iter()
                .map(|edge| edge.id.clone())
                .collect(),
        }
    }

    /// Edges whose activation time falls inside `window`.
    pub fn edges_activated_in(&self, window: TimeWindow) -> Vec<&TemporalEdge> {
        if window.start > window.end {
            return Vec::new();
        }

        self.slots_activated_by(window.end)
            .into_iter()
            .map(|slot| self.edge_at(slot))
            .filter(|edge| edge.activated_at >= window.start)
            .collect()
    }

    /// Edge activations per time unit inside `window`.
    ///
    /// A degenerate window (`end <= start`) yields `0.0`.
    pub fn activation_rate(&self, window: TimeWindow) -> f64 {
        if window.is_degenerate() {
            return 0.0;
        }
        window.rate(self.edges_activated_in(window).len())
    }

    pub(crate) fn require_slot(&self, node: &str) -> Result<usize> {
        self.node_slot(node)
            .ok_or_else(|| GraphError::UnknownNode(NodeId::from(node)))
    }
}
