//! Lazy, time-scoped evaluation over the temporal graph.
//!
//! An edge `A -> B` means "A depends on B". Evaluating a computed node at
//! time `t` pulls the values of the dependencies whose edges are active at
//! `t`, applies the node's formula and memoizes the result under `(node, t)`.
//! Sources hold a fixed value and are never cached.
//!
//! ```rust
//! use tempograph::{Evaluator, Formula};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut eval = Evaluator::new();
//! eval.add_source("salary", 1000.0)?;
//! eval.add_source("bonus", 500.0)?;
//! eval.add_computed("income", Formula::sum())?;
//!
//! eval.depend_on("income", "salary", 0, None)?;
//! eval.depend_on("income", "bonus", 11, None)?;
//!
//! assert_eq!(eval.value_at("income", 5)?, 1000.0);
//! assert_eq!(eval.value_at("income", 15)?, 1500.0);
//! # Ok(())
//! # }
//! ```

mod cache;
mod formula;

pub use cache::{EvaluationCache, NodeCache};
pub use formula::Formula;

use crate::config::Config;
use crate::error::{GraphError, Result};
use crate::graph::TemporalGraph;
use crate::types::{EdgeId, EdgeSpec, NodeId, Timestamp};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Node data of an evaluation graph.
#[derive(Debug, Clone)]
pub enum Quantity {
    /// Fixed value, insensitive to time
    Source { name: String, value: f64 },
    /// Value derived from the dependencies active at the evaluation time
    Computed { name: String, formula: Formula },
}

impl Quantity {
    pub fn source(name: impl Into<String>, value: f64) -> Self {
        Quantity::Source {
            name: name.into(),
            value,
        }
    }

    pub fn computed(name: impl Into<String>, formula: Formula) -> Self {
        Quantity::Computed {
            name: name.into(),
            formula,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Quantity::Source { name, .. } | Quantity::Computed { name, .. } => name,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, Quantity::Source { .. })
    }

    /// Identity function used by evaluation graphs.
    pub fn identity(&self) -> NodeId {
        NodeId::from(self.name())
    }
}

/// Evaluation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalStats {
    /// Formula applications
    pub computations: u64,
    /// Lookups answered from the cache
    pub cache_hits: u64,
    /// Entries dropped by the cache policy
    pub evictions: u64,
    /// Entries dropped by invalidation
    pub invalidated: u64,
}

/// A computed node whose dependencies are being resolved.
struct Frame {
    slot: usize,
    formula: Formula,
    /// Target slots of the edges active at the evaluation time
    dependencies: Vec<usize>,
    /// Index of the next dependency to resolve
    next: usize,
    values: Vec<f64>,
}

/// Lazy evaluator owning a dependency graph and its evaluation cache.
///
/// Single owner, synchronous: `value_at` takes `&mut self` because it fills
/// the cache. Graph mutations through the evaluator do not touch cached
/// values; call `invalidate` (or `invalidate_cascade`) after changing edges
/// or sources that earlier results depended on.
pub struct Evaluator {
    graph: TemporalGraph<Quantity>,
    cache: EvaluationCache,
    /// (node slot, time) pairs currently being computed
    in_progress: FxHashSet<(usize, Timestamp)>,
    stats: EvalStats,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an evaluator with `config`.
    ///
    /// An invalid configuration is only logged; use `try_with_config` or
    /// `EvaluatorBuilder` to reject it.
    pub fn with_config(config: Config) -> Self {
        let cache = EvaluationCache::new(config.cache_policy);
        Self::from_graph(
            TemporalGraph::with_config(Quantity::identity, config),
            cache,
        )
    }

    pub fn try_with_config(config: Config) -> Result<Self> {
        let cache = EvaluationCache::new(config.cache_policy);
        let graph = TemporalGraph::try_with_config(Quantity::identity, config)?;
        Ok(Self::from_graph(graph, cache))
    }

    pub(crate) fn from_graph(graph: TemporalGraph<Quantity>, cache: EvaluationCache) -> Self {
        Self {
            graph,
            cache,
            in_progress: FxHashSet::default(),
            stats: EvalStats::default(),
        }
    }

    pub fn add_source(&mut self, name: impl Into<String>, value: f64) -> Result<NodeId> {
        Ok(self.graph.insert_node(Quantity::source(name, value))?.id.clone())
    }

    pub fn add_computed(&mut self, name: impl Into<String>, formula: Formula) -> Result<NodeId> {
        Ok(self
            .graph
            .insert_node(Quantity::computed(name, formula))?
            .id
            .clone())
    }

    /// Make `dependent` depend on `dependency` during
    /// `[activated_at, deactivated_at]`.
    pub fn depend_on(
        &mut self,
        dependent: &str,
        dependency: &str,
        activated_at: Timestamp,
        deactivated_at: Option<Timestamp>,
    ) -> Result<EdgeId> {
        let mut spec = EdgeSpec::new(dependent, dependency, activated_at);
        spec.deactivated_at = deactivated_at;
        Ok(self.graph.add_edge(spec)?.id.clone())
    }

    /// End a dependency at `at`. Unknown ids are ignored.
    pub fn deactivate_dependency(&mut self, id: &EdgeId, at: Timestamp) -> bool {
        self.graph.deactivate_edge(id, at)
    }

    /// Replace a source's value, returning the previous one.
    ///
    /// Cached values computed from the old value are kept.
    pub fn set_source_value(&mut self, name: &str, value: f64) -> Result<f64> {
        match self.graph.node_data_mut(name) {
            Some(Quantity::Source { value: current, .. }) => {
                Ok(std::mem::replace(current, value))
            }
            Some(Quantity::Computed { .. }) => Err(GraphError::NotASource(NodeId::from(name))),
            None => Err(GraphError::UnknownNode(NodeId::from(name))),
        }
    }

    /// Value of `node` at `time`.
    ///
    /// Each computed (node, time) pair is computed at most once until it is
    /// invalidated or evicted. Fails with `UnknownNode`, with
    /// `CyclicDependency` when a dependency cycle is active at `time`, or
    /// with `DepthLimitExceeded` on chains deeper than
    /// `Config::max_eval_depth`.
    ///
    /// Dependencies are resolved on an explicit work stack, so chain depth
    /// is bounded by `max_eval_depth` and not by the thread stack.
    pub fn value_at(&mut self, node: &str, time: Timestamp) -> Result<f64> {
        let slot = self.graph.require_slot(node)?;

        let result = self.resolve(slot, time);
        self.in_progress.clear();
        result
    }

    fn resolve(&mut self, root: usize, time: Timestamp) -> Result<f64> {
        if let Some(value) = self.lookup(root, time) {
            return Ok(value);
        }

        let mut stack = Vec::new();
        self.enter(root, time, &mut stack)?;

        let mut value = 0.0;
        while let Some(frame) = stack.last_mut() {
            if let Some(&dependency) = frame.dependencies.get(frame.next) {
                frame.next += 1;
                match self.lookup(dependency, time) {
                    Some(ready) => frame.values.push(ready),
                    None => self.enter(dependency, time, &mut stack)?,
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            value = self.complete(done, time);
            if let Some(parent) = stack.last_mut() {
                parent.values.push(value);
            }
        }
        Ok(value)
    }

    /// Value available without computing: a source's value or a cache hit.
    fn lookup(&mut self, slot: usize, time: Timestamp) -> Option<f64> {
        if let Quantity::Source { value, .. } = &self.graph.node_at(slot).data {
            return Some(*value);
        }

        let value = self.cache.get(slot, time)?;
        self.stats.cache_hits += 1;
        log::trace!("Cache hit for {} at {}", self.graph.node_at(slot).id, time);
        Some(value)
    }

    /// Mark a computed node in progress and push its frame.
    fn enter(&mut self, slot: usize, time: Timestamp, stack: &mut Vec<Frame>) -> Result<()> {
        let formula = match &self.graph.node_at(slot).data {
            Quantity::Computed { formula, .. } => formula.clone(),
            Quantity::Source { .. } => return Ok(()),
        };

        if !self.in_progress.insert((slot, time)) {
            let cycle = self.cycle_through(slot, stack);
            log::debug!("Cyclic dependency detected at {}: {:?}", time, cycle);
            return Err(GraphError::CyclicDependency { at: time, cycle });
        }

        let limit = self.graph.config().max_eval_depth;
        if stack.len() >= limit {
            return Err(GraphError::DepthLimitExceeded { at: time, limit });
        }

        let dependencies: Vec<usize> = self
            .graph
            .out_slots(slot)
            .iter()
            .filter(|&&edge_slot| self.graph.edge_at(edge_slot).is_active_at(time))
            .map(|&edge_slot| self.graph.target_slot(edge_slot))
            .collect();

        stack.push(Frame {
            slot,
            values: Vec::with_capacity(dependencies.len()),
            formula,
            dependencies,
            next: 0,
        });
        Ok(())
    }

    /// Apply the formula of a frame whose dependencies are all resolved.
    fn complete(&mut self, frame: Frame, time: Timestamp) -> f64 {
        self.in_progress.remove(&(frame.slot, time));

        let value = frame.formula.apply(&frame.values);
        self.stats.computations += 1;
        log::debug!(
            "Computed {} at {} from {} dependencies: {}",
            self.graph.node_at(frame.slot).id,
            time,
            frame.values.len(),
            value
        );

        if let Some(evicted) = self.cache.insert(frame.slot, time, value) {
            self.stats.evictions += 1;
            log::trace!(
                "Evicted {} at {} from cache",
                self.graph.node_at(frame.slot).id,
                evicted
            );
        }
        value
    }

    /// Node ids from the frame of `slot` up the stack, back to `slot`.
    fn cycle_through(&self, slot: usize, stack: &[Frame]) -> Vec<NodeId> {
        let start = stack
            .iter()
            .position(|frame| frame.slot == slot)
            .unwrap_or(0);
        stack[start..]
            .iter()
            .map(|frame| frame.slot)
            .chain(std::iter::once(slot))
            .map(|s| self.graph.node_at(s).id.clone())
            .collect()
    }

    /// Clear every cached value of `node`, returning how many were dropped.
    ///
    /// Dependents that cached values derived from this node keep them; see
    /// `invalidate_cascade`.
    pub fn invalidate(&mut self, node: &str) -> Result<usize> {
        let slot = self.graph.require_slot(node)?;
        let cleared = self.cache.clear_node(slot);
        self.stats.invalidated += cleared as u64;
        log::debug!("Invalidated {} cached values of {}", cleared, node);
        Ok(cleared)
    }

    /// Clear `node` and every node that transitively depends on it through
    /// an edge, active or not.
    pub fn invalidate_cascade(&mut self, node: &str) -> Result<usize> {
        let start = self.graph.require_slot(node)?;

        let mut dependents: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (edge_slot, edge) in self.graph.edges().enumerate() {
            if let Some(from) = self.graph.node_slot(edge.from.as_str()) {
                dependents
                    .entry(self.graph.target_slot(edge_slot))
                    .or_default()
                    .push(from);
            }
        }

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        let mut cleared = 0;
        while let Some(slot) = queue.pop_front() {
            if !seen.insert(slot) {
                continue;
            }
            cleared += self.cache.clear_node(slot);
            if let Some(next) = dependents.get(&slot) {
                queue.extend(next.iter().copied());
            }
        }

        self.stats.invalidated += cleared as u64;
        log::debug!(
            "Invalidated {} cached values across {} nodes from {}",
            cleared,
            seen.len(),
            node
        );
        Ok(cleared)
    }

    pub fn invalidate_all(&mut self) -> usize {
        let cleared = self.cache.clear_all();
        self.stats.invalidated += cleared as u64;
        cleared
    }

    /// Timestamps currently cached for `node`, ascending.
    pub fn cached_times(&self, node: &str) -> Result<Vec<Timestamp>> {
        let slot = self.graph.require_slot(node)?;
        Ok(self.cache.node(slot).map(NodeCache::times).unwrap_or_default())
    }

    pub fn is_cached(&self, node: &str, time: Timestamp) -> bool {
        self.graph
            .node_slot(node)
            .is_some_and(|slot| self.cache.get(slot, time).is_some())
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Read-only view of the dependency graph for interval queries.
    pub fn graph(&self) -> &TemporalGraph<Quantity> {
        &self.graph
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
