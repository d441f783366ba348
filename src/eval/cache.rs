//! Per-node, per-timestamp memoization of computed values.
//!
//! Entries are never invalidated automatically. A value cached for time `t`
//! goes stale if the edges active at `t`, or any source value beneath the
//! node, change afterwards; the caller clears it with `Evaluator::invalidate`.

use crate::config::CachePolicy;
use crate::types::Timestamp;
use std::collections::{BTreeMap, VecDeque};

/// Cached values of one node.
#[derive(Debug, Clone, Default)]
pub struct NodeCache {
    values: BTreeMap<Timestamp, f64>,
    /// Insertion order, used for FIFO eviction
    order: VecDeque<Timestamp>,
}

impl NodeCache {
    pub fn get(&self, time: Timestamp) -> Option<f64> {
        self.values.get(&time).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cached timestamps, ascending.
    pub fn times(&self) -> Vec<Timestamp> {
        self.values.keys().copied().collect()
    }

    /// Store `value` at `time`, returning the timestamp evicted to make room.
    fn insert(
        &mut self,
        time: Timestamp,
        value: f64,
        capacity: Option<usize>,
    ) -> Option<Timestamp> {
        if self.values.insert(time, value).is_some() {
            return None;
        }
        self.order.push_back(time);

        match capacity {
            Some(capacity) if self.values.len() > capacity => {
                let evicted = self.order.pop_front()?;
                self.values.remove(&evicted);
                Some(evicted)
            }
            _ => None,
        }
    }

    fn clear(&mut self) -> usize {
        let cleared = self.values.len();
        self.values.clear();
        self.order.clear();
        cleared
    }
}

/// Cache table indexed by node slot.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCache {
    nodes: Vec<NodeCache>,
    policy: CachePolicy,
}

impl EvaluationCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            nodes: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub(crate) fn get(&self, slot: usize, time: Timestamp) -> Option<f64> {
        self.nodes.get(slot).and_then(|cache| cache.get(time))
    }

    pub(crate) fn node(&self, slot: usize) -> Option<&NodeCache> {
        self.nodes.get(slot)
    }

    pub(crate) fn insert(&mut self, slot: usize, time: Timestamp, value: f64) -> Option<Timestamp> {
        if self.nodes.len() <= slot {
            self.nodes.resize_with(slot + 1, NodeCache::default);
        }
        self.nodes[slot].insert(time, value, self.policy.capacity())
    }

    /// Drop every entry of one node, returning how many were removed.
    pub(crate) fn clear_node(&mut self, slot: usize) -> usize {
        self.nodes.get_mut(slot).map_or(0, NodeCache::clear)
    }

    pub(crate) fn clear_all(&mut self) -> usize {
        self.nodes.iter_mut().map(NodeCache::clear).sum()
    }

    /// Total number of cached (node, time) pairs.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(NodeCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(NodeCache::is_empty)
    }
}
