//! Node, edge and snapshot types stored by the temporal graph.
//!
//! Identity and interval primitives live in the `tempograph-types` crate and
//! are re-exported from here.
use serde::{Deserialize, Serialize};

pub use tempograph_types::{EdgeId, Interval, NodeId, TimeWindow, Timestamp};

/// A node owned by the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    pub id: NodeId,
    pub data: T,
}

/// A directed edge that exists during its activation interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Caller-supplied creation time; defaults to `activated_at`.
    pub created_at: Timestamp,
    pub activated_at: Timestamp,
    /// `None` means active until further notice.
    pub deactivated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TemporalEdge {
    pub fn interval(&self) -> Interval {
        Interval::new(self.activated_at, self.deactivated_at)
    }

    /// `activated_at <= time <= deactivated_at`, open end treated as infinity.
    #[inline]
    pub fn is_active_at(&self, time: Timestamp) -> bool {
        self.interval().contains(time)
    }

    #[inline]
    pub fn overlaps(&self, t0: Timestamp, t1: Timestamp) -> bool {
        self.interval().overlaps(t0, t1)
    }

    pub fn is_open(&self) -> bool {
        self.deactivated_at.is_none()
    }
}

/// Parameters for `TemporalGraph::add_edge`.
///
/// # Example
///
/// ```rust
/// use tempograph::EdgeSpec;
///
/// let spec = EdgeSpec::new("a", "b", 10)
///     .deactivated_at(20)
///     .data(serde_json::json!({"weight": 3}));
/// assert_eq!(spec.deactivated_at, Some(20));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
    pub activated_at: Timestamp,
    pub deactivated_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub data: Option<serde_json::Value>,
}

impl EdgeSpec {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, activated_at: Timestamp) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            activated_at,
            deactivated_at: None,
            created_at: None,
            data: None,
        }
    }

    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn deactivated_at(mut self, at: Timestamp) -> Self {
        self.deactivated_at = Some(at);
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Nodes and active edges at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: Timestamp,
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Snapshot {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Graph size counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges whose interval has no end.
    pub open_edge_count: usize,
    pub deactivations: u64,
}
