//! Fractional ordering keys for tasks within a column.
//!
//! Positions are finite `f64` values. Inserting between two siblings takes
//! the arithmetic mean, so no sibling is ever renumbered. Repeated bisection
//! at the same spot eventually exhausts `f64` precision; callers detect that
//! with [`Position::is_strictly_between`] and rebalance the column out of
//! band with [`Position::rebalanced`].

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordering key of a task within its column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(f64);

impl Position {
    /// Gap between consecutive positions appended at the bottom of a column.
    pub const DEFAULT_STRIDE: f64 = 1000.0;

    /// Creates a validated position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPosition`] for NaN or infinite
    /// values.
    pub const fn new(value: f64) -> Result<Self, TaskDomainError> {
        if !value.is_finite() {
            return Err(TaskDomainError::InvalidPosition(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw key.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns a position one stride after `max`, or the stride itself when
    /// the column is empty.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "positions are f64 keys")]
    pub fn next_after(max: Option<Self>, stride: f64) -> Self {
        match max {
            Some(last) => Self(last.0 + stride),
            None => Self(stride),
        }
    }

    /// Returns the arithmetic mean of two positions.
    ///
    /// The result is strictly between the bounds whenever `before < after`
    /// and the two are far enough apart to have a representable midpoint.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "positions are f64 keys")]
    pub fn between(before: Self, after: Self) -> Self {
        // Halve first so two large keys cannot overflow to infinity.
        Self(before.0 / 2.0 + after.0 / 2.0)
    }

    /// Returns a position ahead of `first`, used to move a task to the top
    /// of a column.
    ///
    /// This bisects between `first` and a virtual predecessor one stride
    /// below it, which keeps the key finite.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "positions are f64 keys")]
    pub fn before_first(first: Option<Self>, stride: f64) -> Self {
        match first {
            Some(head) => Self::between(Self(head.0 - stride), head),
            None => Self(stride),
        }
    }

    /// Returns `true` when `self` sorts strictly after `before` and
    /// strictly before `after`.
    #[must_use]
    pub fn is_strictly_between(self, before: Self, after: Self) -> bool {
        self > before && self < after
    }

    /// Returns `true` when `self`, computed by [`Position::between`], has
    /// collapsed onto one of its bounds and the column needs a rebalance.
    #[must_use]
    pub fn is_degenerate_between(self, before: Self, after: Self) -> bool {
        !self.is_strictly_between(before, after)
    }

    /// Yields `count` evenly spaced positions starting at `stride`.
    #[expect(clippy::float_arithmetic, reason = "positions are f64 keys")]
    pub fn rebalanced(count: usize, stride: f64) -> impl Iterator<Item = Self> {
        (1..=count).scan(0.0_f64, move |current, _| {
            *current += stride;
            Some(Self(*current))
        })
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
