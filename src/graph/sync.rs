//! Thread-safe wrappers for shared graph access.
//!
//! `TemporalGraph` and `Evaluator` assume a single owner. These wrappers put
//! the whole structure behind one lock so every read and write is
//! serialized, which is the only supported way to share them.

use super::TemporalGraph;
use crate::error::Result;
use crate::eval::{EvalStats, Evaluator, Formula};
use crate::types::{EdgeId, EdgeSpec, NodeId, TemporalEdge, Timestamp};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Shared `TemporalGraph` behind a read-write lock.
pub struct SyncGraph<T> {
    inner: Arc<RwLock<TemporalGraph<T>>>,
}

impl<T> Clone for SyncGraph<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SyncGraph<T> {
    pub fn new(graph: TemporalGraph<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn insert_node(&self, data: T) -> Result<NodeId> {
        Ok(self.inner.write().insert_node(data)?.id.clone())
    }

    pub fn add_edge(&self, spec: EdgeSpec) -> Result<EdgeId> {
        Ok(self.inner.write().add_edge(spec)?.id.clone())
    }

    pub fn deactivate_edge(&self, id: &EdgeId, at: Timestamp) -> bool {
        self.inner.write().deactivate_edge(id, at)
    }

    /// Owned copies of the edges active at `time`.
    pub fn active_at(&self, time: Timestamp) -> Vec<TemporalEdge> {
        self.inner
            .read()
            .active_at(time)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn edges_overlapping(&self, t0: Timestamp, t1: Timestamp) -> Vec<TemporalEdge> {
        self.inner
            .read()
            .edges_overlapping(t0, t1)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn outgoing(&self, node: &str) -> Result<Vec<TemporalEdge>> {
        Ok(self
            .inner
            .read()
            .outgoing(node)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Run `f` with shared access to the graph.
    pub fn read<R>(&self, f: impl FnOnce(&TemporalGraph<T>) -> R) -> R {
        let guard = self.inner.read();
        f(&*guard)
    }

    /// Run `f` with exclusive access to the graph.
    pub fn write<R>(&self, f: impl FnOnce(&mut TemporalGraph<T>) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut *guard)
    }
}

/// Shared `Evaluator` behind a mutex.
///
/// Evaluation fills the cache, so even reads need exclusive access.
#[derive(Clone)]
pub struct SyncEvaluator {
    inner: Arc<Mutex<Evaluator>>,
}

impl SyncEvaluator {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(evaluator)),
        }
    }

    pub fn add_source(&self, name: impl Into<String>, value: f64) -> Result<NodeId> {
        self.inner.lock().add_source(name, value)
    }

    pub fn add_computed(&self, name: impl Into<String>, formula: Formula) -> Result<NodeId> {
        self.inner.lock().add_computed(name, formula)
    }

    pub fn depend_on(
        &self,
        dependent: &str,
        dependency: &str,
        activated_at: Timestamp,
        deactivated_at: Option<Timestamp>,
    ) -> Result<EdgeId> {
        self.inner
            .lock()
            .depend_on(dependent, dependency, activated_at, deactivated_at)
    }

    pub fn value_at(&self, node: &str, time: Timestamp) -> Result<f64> {
        self.inner.lock().value_at(node, time)
    }

    pub fn invalidate(&self, node: &str) -> Result<usize> {
        self.inner.lock().invalidate(node)
    }

    pub fn stats(&self) -> EvalStats {
        self.inner.lock().stats()
    }

    /// Run `f` with exclusive access to the evaluator.
    pub fn with<R>(&self, f: impl FnOnce(&mut Evaluator) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }
}
