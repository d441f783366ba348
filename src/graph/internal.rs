//! Arena and index maintenance for the entity store.

use super::{EdgeSlots, TemporalGraph};
use crate::config::DuplicateEdgePolicy;
use crate::error::{GraphError, Result};
use crate::types::{EdgeId, EdgeSpec, Node, TemporalEdge, Timestamp};

impl<T> TemporalGraph<T> {
    #[inline]
    pub(crate) fn node_slot(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn push_node(&mut self, node: Node<T>) -> usize {
        let slot = self.nodes.len();
        self.node_index.insert(node.id.clone(), slot);
        self.nodes.push(node);
        self.adjacency.push(EdgeSlots::new());

        self.stats.node_count = self.nodes.len();
        slot
    }

    /// Sequence number for a new edge with this `(from, to, activated_at)`.
    ///
    /// Only reserves the number once the policy allows the edge.
    pub(super) fn next_edge_seq(&mut self, spec: &EdgeSpec) -> Result<u32> {
        let key = (spec.from.clone(), spec.to.clone(), spec.activated_at);
        let existing = self.edge_seq.get(&key).copied().unwrap_or(0);

        if existing > 0 && self.config.duplicate_edges == DuplicateEdgePolicy::Reject {
            return Err(GraphError::DuplicateEdge(EdgeId::new(
                key.0,
                key.1,
                key.2,
                0,
            )));
        }

        self.edge_seq.insert(key, existing + 1);
        Ok(existing)
    }

    pub(super) fn push_edge(
        &mut self,
        edge: TemporalEdge,
        from_slot: usize,
        to_slot: usize,
    ) -> usize {
        let slot = self.edges.len();

        self.edge_index.insert(edge.id.clone(), slot);
        self.adjacency[from_slot].push(slot);
        self.edge_targets.push(to_slot);

        #[cfg(feature = "time-index")]
        self.activation_index
            .entry(edge.activated_at)
            .or_default()
            .push(slot);

        if edge.is_open() {
            self.stats.open_edge_count += 1;
        }
        self.edges.push(edge);
        self.stats.edge_count = self.edges.len();
        slot
    }

    /// Outgoing edge slots of a node slot, in insertion order.
    #[inline]
    pub(crate) fn out_slots(&self, node_slot: usize) -> &[usize] {
        &self.adjacency[node_slot]
    }

    #[inline]
    pub(crate) fn edge_at(&self, edge_slot: usize) -> &TemporalEdge {
        &self.edges[edge_slot]
    }

    #[inline]
    pub(crate) fn target_slot(&self, edge_slot: usize) -> usize {
        self.edge_targets[edge_slot]
    }

    #[inline]
    pub(crate) fn node_at(&self, node_slot: usize) -> &Node<T> {
        &self.nodes[node_slot]
    }

    /// Edge slots with `activated_at <= bound`, ascending.
    ///
    /// Every edge that can be active at or overlap a window ending at
    /// `bound` is among them.
    #[cfg(feature = "time-index")]
    pub(crate) fn slots_activated_by(&self, bound: Timestamp) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .activation_index
            .range(..=bound)
            .flat_map(|(_, slots)| slots.iter().copied())
            .collect();
        slots.sort_unstable();
        slots
    }

    #[cfg(not(feature = "time-index"))]
    pub(crate) fn slots_activated_by(&self, bound: Timestamp) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.activated_at <= bound)
            .map(|(slot, _)| slot)
            .collect()
    }
}
