//! Error types for tempograph.

use crate::types::{EdgeId, NodeId, Timestamp};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A node with the same identity is already stored. The graph is unchanged.
    #[error("node '{0}' already exists")]
    DuplicateIdentity(NodeId),

    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// Only raised under `DuplicateEdgePolicy::Reject`.
    #[error("edge '{0}' already exists")]
    DuplicateEdge(EdgeId),

    /// Evaluation re-entered a node that was still being computed at `at`.
    /// `cycle` starts and ends with the re-entered node.
    #[error("cyclic dependency at t={at}: {}", format_cycle(.cycle))]
    CyclicDependency { at: Timestamp, cycle: Vec<NodeId> },

    #[error("dependency depth exceeded {limit} while evaluating at t={at}")]
    DepthLimitExceeded { at: Timestamp, limit: usize },

    #[error("identity function produced an invalid id: {0}")]
    InvalidIdentity(String),

    #[error("node '{0}' is not a source")]
    NotASource(NodeId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_cycle(cycle: &[NodeId]) -> String {
    cycle
        .iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::Serialization(e.to_string())
    }
}
