use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Activation interval of an edge.
///
/// Both bounds are inclusive. A missing `end` means the interval is open
/// and every comparison treats it as positive infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl Interval {
    /// Interval starting at `start` with no end.
    pub fn open_from(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    /// Interval covering `[start, end]`.
    ///
    /// `start <= end` is not checked; an inverted interval contains nothing.
    pub fn closed(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Whether the interval has no end yet.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Effective end, `Timestamp::MAX` standing in for infinity.
    pub fn effective_end(&self) -> Timestamp {
        self.end.unwrap_or(Timestamp::MAX)
    }

    /// `start <= time <= end`.
    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time <= self.effective_end()
    }

    /// Whether this interval intersects `[t0, t1]`. Touching endpoints count.
    ///
    /// An inverted window (`t0 > t1`) is empty and overlaps nothing, even an
    /// interval that spans both bounds.
    pub fn overlaps(&self, t0: Timestamp, t1: Timestamp) -> bool {
        t0 <= t1 && self.effective_end() >= t0 && self.start <= t1
    }

    pub fn overlaps_interval(&self, other: &Interval) -> bool {
        self.overlaps(other.start, other.effective_end())
    }

    /// Length of the interval, `None` while it is open.
    pub fn duration(&self) -> Option<Timestamp> {
        self.end.map(|end| end.saturating_sub(self.start).max(0))
    }
}

/// Query window `[start, end]` used by rate-style aggregates.
///
/// A window whose `end <= start` is degenerate: its span is zero and any
/// rate computed over it is zero. Aggregates go through this type so none of
/// them needs its own guard.
///
/// # Examples
///
/// ```
/// use tempograph_types::TimeWindow;
///
/// let window = TimeWindow::new(10, 20);
/// assert_eq!(window.span(), 10);
/// assert_eq!(window.rate(5), 0.5);
///
/// let inverted = TimeWindow::new(20, 10);
/// assert!(inverted.is_degenerate());
/// assert_eq!(inverted.rate(5), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Width of the window, zero when degenerate.
    pub fn span(&self) -> Timestamp {
        if self.is_degenerate() {
            0
        } else {
            self.end.saturating_sub(self.start)
        }
    }

    /// `count / span`, zero when degenerate.
    pub fn rate(&self, count: usize) -> f64 {
        match self.span() {
            0 => 0.0,
            span => count as f64 / span as f64,
        }
    }

    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time <= self.end
    }
}
