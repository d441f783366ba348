//! In-memory temporal graph with interval queries and lazy, time-scoped evaluation.
//!
//! ## Features
//! - **Activation intervals**: every edge exists during `[activated_at, deactivated_at]`,
//!   an open end meaning "until further notice"
//! - **Interval queries**: edges active at an instant or overlapping a window
//! - **Time-respecting paths**: earliest-arrival search over non-decreasing activation times
//! - **Lazy evaluation**: computed nodes pull values from the dependencies active at the
//!   requested time, memoized per `(node, time)` with cycle detection
//!
//! Time is an explicit `i64` argument everywhere; nothing reads a clock.
//!
//! ## Cache contract
//! Cached values are never invalidated automatically. Mutating edges or source values
//! after a value was computed for time `t` leaves that value stale until
//! `Evaluator::invalidate` (or `invalidate_cascade`) is called.
//!
//! ```rust
//! use tempograph::{Evaluator, Formula};
//!
//! let mut eval = Evaluator::new();
//! eval.add_source("salary", 1000.0)?;
//! eval.add_source("bonus", 500.0)?;
//! eval.add_computed("income", Formula::sum())?;
//! eval.depend_on("income", "salary", 0, None)?;
//! eval.depend_on("income", "bonus", 11, None)?;
//!
//! assert_eq!(eval.value_at("income", 5)?, 1000.0);
//! assert_eq!(eval.value_at("income", 15)?, 1500.0);
//!
//! // Interval queries over the same dependency graph
//! assert_eq!(eval.graph().active_at(5).len(), 1);
//! # Ok::<(), tempograph::GraphError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod eval;
pub mod graph;
pub mod types;

pub use builder::{EvaluatorBuilder, GraphBuilder};
pub use error::{GraphError, Result};
pub use graph::{IdentityFn, TemporalGraph};

#[cfg(feature = "sync")]
pub use graph::{SyncEvaluator, SyncGraph};

pub use compute::temporal::TemporalPath;
pub use config::{CachePolicy, Config, DuplicateEdgePolicy};
pub use eval::{EvalStats, EvaluationCache, Evaluator, Formula, NodeCache, Quantity};

pub use types::{
    EdgeId, EdgeSpec, GraphStats, Interval, Node, NodeId, Snapshot, TemporalEdge, TimeWindow,
    Timestamp,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{EvaluatorBuilder, GraphBuilder, GraphError, Result, TemporalGraph};

    #[cfg(feature = "sync")]
    pub use crate::{SyncEvaluator, SyncGraph};

    pub use crate::{EdgeId, EdgeSpec, Interval, NodeId, TimeWindow, Timestamp};

    pub use crate::{Evaluator, Formula, Quantity};

    pub use crate::{CachePolicy, Config, DuplicateEdgePolicy};
}
