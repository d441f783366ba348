use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identity of a node, produced by the graph's identity function.
///
/// # Examples
///
/// ```
/// use tempograph_types::NodeId;
///
/// let id = NodeId::from("salary");
/// assert_eq!(id.as_str(), "salary");
/// assert!(!id.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns a reference to the inner string of the identity.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a temporal edge.
///
/// Derived from `(from, to, activated_at)` plus a sequence number that
/// separates edges sharing those three components. The first such edge gets
/// `seq == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId {
    pub from: NodeId,
    pub to: NodeId,
    pub activated_at: Timestamp,
    #[serde(default)]
    pub seq: u32,
}

impl EdgeId {
    pub fn new(from: NodeId, to: NodeId, activated_at: Timestamp, seq: u32) -> Self {
        Self {
            from,
            to,
            activated_at,
            seq,
        }
    }

    /// The identity shared by every edge with the same endpoints and start.
    pub fn base(&self) -> (NodeId, NodeId, Timestamp) {
        (self.from.clone(), self.to.clone(), self.activated_at)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}@{}", self.from, self.to, self.activated_at)?;
        if self.seq > 0 {
            write!(f, "#{}", self.seq)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), None);
    }

    #[test]
    fn test_edge_id_display() {
        let first = EdgeId::new("a".into(), "b".into(), 10, 0);
        let second = EdgeId::new("a".into(), "b".into(), 10, 1);

        assert_eq!(first.to_string(), "a->b@10");
        assert_eq!(second.to_string(), "a->b@10#1");
        assert_ne!(first, second);
        assert_eq!(first.base(), second.base());
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let json = serde_json::to_string(&NodeId::from("bonus")).unwrap();
        assert_eq!(json, "\"bonus\"");
    }
}
