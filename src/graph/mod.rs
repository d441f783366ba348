//! Entity store for the temporal graph.
//!
//! This module defines `TemporalGraph`, which owns every node and edge,
//! assigns identities and maintains the adjacency index. Interval queries and
//! traversal live in `crate::compute::temporal` as further `impl` blocks.

use crate::config::Config;
use crate::error::{GraphError, Result};
use crate::types::{EdgeId, EdgeSpec, GraphStats, Node, NodeId, TemporalEdge, Timestamp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
#[cfg(feature = "time-index")]
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

mod internal;

#[cfg(feature = "sync")]
mod sync;

#[cfg(feature = "sync")]
pub use sync::{SyncEvaluator, SyncGraph};

/// Deterministic mapping from node data to its identity.
pub type IdentityFn<T> = Arc<dyn Fn(&T) -> NodeId + Send + Sync>;

pub(crate) type EdgeSlots = SmallVec<[usize; 4]>;

/// In-memory temporal graph (single owner, no interior locking).
///
/// Nodes are stored in an arena and resolved through an id index. Edges are
/// never removed: deactivation only sets their end time. Each node's
/// outgoing edges are kept in insertion order, which is also the order every
/// adjacency query returns them in.
///
/// # Thread Safety
///
/// `TemporalGraph` performs no synchronization. Mutation needs `&mut self`,
/// so sharing it across threads requires an external lock; the `sync`
/// feature provides `SyncGraph` for that.
///
/// # Examples
///
/// ```rust
/// use tempograph::{EdgeSpec, TemporalGraph};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = TemporalGraph::with_identity(|name: &String| name.as_str().into());
/// graph.insert_node("a".to_string())?;
/// graph.insert_node("b".to_string())?;
///
/// let edge = graph.add_edge(EdgeSpec::new("a", "b", 10).deactivated_at(20))?.id.clone();
///
/// assert_eq!(graph.active_at(15).len(), 1);
/// assert!(graph.active_at(22).is_empty());
///
/// graph.deactivate_edge(&edge, 12);
/// assert!(graph.active_at(15).is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TemporalGraph<T> {
    /// Node arena, indexed by slot
    pub(crate) nodes: Vec<Node<T>>,
    /// Node id -> arena slot
    pub(crate) node_index: FxHashMap<NodeId, usize>,
    /// Edge arena in insertion order
    pub(crate) edges: Vec<TemporalEdge>,
    /// Edge id -> arena slot
    pub(crate) edge_index: FxHashMap<EdgeId, usize>,
    /// Target node slot for every edge slot
    pub(crate) edge_targets: Vec<usize>,
    /// Outgoing edge slots per node slot
    pub(crate) adjacency: Vec<EdgeSlots>,
    /// Number of edges created per `(from, to, activated_at)`
    pub(crate) edge_seq: FxHashMap<(NodeId, NodeId, Timestamp), u32>,
    #[cfg(feature = "time-index")]
    /// Edge slots keyed by activation time
    pub(crate) activation_index: BTreeMap<Timestamp, EdgeSlots>,
    identity: IdentityFn<T>,
    pub(crate) stats: GraphStats,
    pub(crate) config: Config,
}

impl<T> TemporalGraph<T> {
    /// Create an empty graph that derives node ids with `identity`.
    pub fn with_identity<F>(identity: F) -> Self
    where
        F: Fn(&T) -> NodeId + Send + Sync + 'static,
    {
        Self::with_config(identity, Config::default())
    }

    /// Create an empty graph with `config`.
    ///
    /// An invalid configuration is only logged; `try_with_config` and
    /// `GraphBuilder` reject it instead.
    pub fn with_config<F>(identity: F, config: Config) -> Self
    where
        F: Fn(&T) -> NodeId + Send + Sync + 'static,
    {
        if let Err(reason) = config.validate() {
            log::warn!("Using invalid graph configuration: {}", reason);
        }
        Self::from_parts(Arc::new(identity), config, 0, 0)
    }

    /// Create an empty graph with `config`, failing with `InvalidConfig`
    /// if it does not validate.
    pub fn try_with_config<F>(identity: F, config: Config) -> Result<Self>
    where
        F: Fn(&T) -> NodeId + Send + Sync + 'static,
    {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self::from_parts(Arc::new(identity), config, 0, 0))
    }

    pub(crate) fn from_parts(
        identity: IdentityFn<T>,
        config: Config,
        node_capacity: usize,
        edge_capacity: usize,
    ) -> Self {
        Self {
            nodes: Vec::with_capacity(node_capacity),
            node_index: FxHashMap::default(),
            edges: Vec::with_capacity(edge_capacity),
            edge_index: FxHashMap::default(),
            edge_targets: Vec::with_capacity(edge_capacity),
            adjacency: Vec::with_capacity(node_capacity),
            edge_seq: FxHashMap::default(),
            #[cfg(feature = "time-index")]
            activation_index: BTreeMap::new(),
            identity,
            stats: GraphStats::default(),
            config,
        }
    }

    /// Insert a node, deriving its id from `data`.
    ///
    /// Fails with `DuplicateIdentity` if the id is already present, leaving
    /// the graph unchanged.
    pub fn insert_node(&mut self, data: T) -> Result<&Node<T>> {
        let id = (self.identity)(&data);
        if id.is_empty() {
            return Err(GraphError::InvalidIdentity(
                "node identity cannot be empty".into(),
            ));
        }
        if self.node_index.contains_key(&id) {
            return Err(GraphError::DuplicateIdentity(id));
        }

        let slot = self.push_node(Node { id, data });
        Ok(&self.nodes[slot])
    }

    pub fn get_node(&self, id: &str) -> Option<&Node<T>> {
        self.node_slot(id).map(|slot| &self.nodes[slot])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Mutable access to a node's data.
    ///
    /// The node keeps the id it was inserted with even if `data` changes.
    pub fn node_data_mut(&mut self, id: &str) -> Option<&mut T> {
        let slot = self.node_slot(id)?;
        Some(&mut self.nodes[slot].data)
    }

    /// Add a temporal edge `from -> to`.
    ///
    /// Fails with `UnknownNode` if either endpoint is missing. Self-loops and
    /// cycles are allowed. An edge repeating an existing
    /// `(from, to, activated_at)` is handled by `Config::duplicate_edges`.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<&TemporalEdge> {
        let from_slot = self
            .node_slot(spec.from.as_str())
            .ok_or_else(|| GraphError::UnknownNode(spec.from.clone()))?;
        let to_slot = self
            .node_slot(spec.to.as_str())
            .ok_or_else(|| GraphError::UnknownNode(spec.to.clone()))?;

        let seq = self.next_edge_seq(&spec)?;

        if let Some(end) = spec.deactivated_at
            && end < spec.activated_at
        {
            log::warn!(
                "Edge {}->{} ends at {} before it activates at {}",
                spec.from,
                spec.to,
                end,
                spec.activated_at
            );
        }

        let edge = TemporalEdge {
            id: EdgeId::new(spec.from.clone(), spec.to.clone(), spec.activated_at, seq),
            from: spec.from,
            to: spec.to,
            created_at: spec.created_at.unwrap_or(spec.activated_at),
            activated_at: spec.activated_at,
            deactivated_at: spec.deactivated_at,
            data: spec.data,
        };

        let slot = self.push_edge(edge, from_slot, to_slot);
        Ok(&self.edges[slot])
    }

    /// Shorthand for an open-ended edge without payload.
    pub fn connect(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        activated_at: Timestamp,
    ) -> Result<EdgeId> {
        Ok(self
            .add_edge(EdgeSpec::new(from, to, activated_at))?
            .id
            .clone())
    }

    /// End an edge's activation interval at `at`.
    ///
    /// Unknown ids are ignored so deactivation can be repeated safely; the
    /// return value tells whether an edge was found. `at` is not checked
    /// against `activated_at`, and deactivating twice keeps the latest `at`.
    pub fn deactivate_edge(&mut self, id: &EdgeId, at: Timestamp) -> bool {
        let Some(&slot) = self.edge_index.get(id) else {
            log::debug!("Ignoring deactivation of unknown edge {}", id);
            return false;
        };

        let edge = &mut self.edges[slot];
        if at < edge.activated_at {
            log::warn!(
                "Edge {} deactivated at {} before its activation at {}",
                id,
                at,
                edge.activated_at
            );
        }
        if edge.deactivated_at.is_none() {
            self.stats.open_edge_count -= 1;
        }
        edge.deactivated_at = Some(at);
        self.stats.deactivations += 1;
        true
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&TemporalEdge> {
        self.edge_index.get(id).map(|&slot| &self.edges[slot])
    }

    /// All nodes, in insertion order.
    pub fn all_nodes(&self) -> Vec<&Node<T>> {
        self.nodes.iter().collect()
    }

    /// All edges, in insertion order.
    pub fn all_edges(&self) -> Vec<&TemporalEdge> {
        self.edges.iter().collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &TemporalEdge> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<T: fmt::Debug> fmt::Debug for TemporalGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalGraph")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("stats", &self.stats)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
