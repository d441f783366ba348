//! Builders for graphs and evaluators.
//!
//! Builders validate the configuration once, up front, so the constructed
//! graph never sees an invalid `Config`.

use crate::config::{CachePolicy, Config, DuplicateEdgePolicy};
use crate::error::{GraphError, Result};
use crate::eval::{EvaluationCache, Evaluator, Quantity};
use crate::graph::{IdentityFn, TemporalGraph};
use crate::types::NodeId;
use std::sync::Arc;

/// Builder for `TemporalGraph` with an identity function, configuration and
/// capacity hints.
///
/// ```rust
/// use tempograph::{DuplicateEdgePolicy, GraphBuilder, NodeId};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = GraphBuilder::new(|name: &String| NodeId::from(name.as_str()))
///     .duplicate_edges(DuplicateEdgePolicy::Reject)
///     .node_capacity(128)
///     .build()?;
///
/// graph.insert_node("a".to_string())?;
/// # Ok(())
/// # }
/// ```
pub struct GraphBuilder<T> {
    identity: IdentityFn<T>,
    config: Config,
    node_capacity: usize,
    edge_capacity: usize,
}

impl<T> GraphBuilder<T> {
    pub fn new<F>(identity: F) -> Self
    where
        F: Fn(&T) -> NodeId + Send + Sync + 'static,
    {
        Self {
            identity: Arc::new(identity),
            config: Config::default(),
            node_capacity: 0,
            edge_capacity: 0,
        }
    }

    /// Set the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn duplicate_edges(mut self, policy: DuplicateEdgePolicy) -> Self {
        self.config.duplicate_edges = policy;
        self
    }

    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    pub fn edge_capacity(mut self, capacity: usize) -> Self {
        self.edge_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<TemporalGraph<T>> {
        self.config.validate().map_err(GraphError::InvalidConfig)?;

        Ok(TemporalGraph::from_parts(
            self.identity,
            self.config,
            self.node_capacity,
            self.edge_capacity,
        ))
    }
}

/// Builder for `Evaluator`.
#[derive(Debug, Default)]
pub struct EvaluatorBuilder {
    config: Config,
    node_capacity: usize,
    edge_capacity: usize,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.config.cache_policy = policy;
        self
    }

    pub fn max_eval_depth(mut self, depth: usize) -> Self {
        self.config.max_eval_depth = depth;
        self
    }

    pub fn node_capacity(mut self, capacity: usize) -> Self {
        self.node_capacity = capacity;
        self
    }

    pub fn edge_capacity(mut self, capacity: usize) -> Self {
        self.edge_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Evaluator> {
        self.config.validate().map_err(GraphError::InvalidConfig)?;

        let cache = EvaluationCache::new(self.config.cache_policy);
        let graph = TemporalGraph::from_parts(
            Arc::new(Quantity::identity),
            self.config,
            self.node_capacity,
            self.edge_capacity,
        );
        Ok(Evaluator::from_graph(graph, cache))
    }
}
