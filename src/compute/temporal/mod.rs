//! Temporal computation and query processing.
//!
//! - `queries`: point-in-time and window queries, adjacency views, snapshots
//! - `traversal`: earliest-arrival time-respecting paths

pub mod queries;
pub mod traversal;

pub use traversal::TemporalPath;
