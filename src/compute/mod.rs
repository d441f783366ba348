//! Compute layer for query processing and algorithms.
//!
//! This module separates computation and query logic from the entity store.
//! It provides:
//! - Interval queries over edge activation intervals
//! - Time-respecting traversal

pub mod temporal;
