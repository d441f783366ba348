//! # tempograph-types
//!
//! Core identity and time types shared by the tempograph crates.
//!
//! - **Identity types**: `NodeId`, `EdgeId`
//! - **Time types**: `Timestamp`, `Interval`, `TimeWindow`
//!
//! All types are serializable with Serde. Time is an abstract signed integer
//! chosen by the caller (seconds, ticks, periods); nothing here reads a clock.
//!
//! ## Examples
//!
//! ```rust
//! use tempograph_types::interval::Interval;
//!
//! let interval = Interval::closed(10, 20);
//! assert!(interval.contains(20));
//! assert!(!interval.contains(22));
//! assert!(interval.overlaps(20, 30));
//! ```

pub mod id;
pub mod interval;

/// Point on the caller's time axis.
pub type Timestamp = i64;

pub use id::{EdgeId, NodeId};
pub use interval::{Interval, TimeWindow};
