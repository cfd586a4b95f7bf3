//! A half-open span of rational time with an attached payload.

use std::collections::BTreeMap;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::{IntervalError, IntervalResult};
use crate::primitives::{Duration, Offset};

/// Free-form annotations carried by an interval. Keys and values are
/// opaque to the index; equality of intervals includes them.
pub type Payload = BTreeMap<String, String>;

/// Immutable `[start, stop)` span. Transformations build new values
/// and never touch the original.
///
/// # Example
/// ```
/// use score_tree::intervals::TimeInterval;
///
/// let span = TimeInterval::new(0, 10).unwrap();
/// let moved = span.shift_by(fraction::Fraction::from(2));
/// assert_eq!(moved, TimeInterval::new(2, 12).unwrap());
/// assert_eq!(span, TimeInterval::new(0, 10).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    start: Offset,
    stop: Offset,
    payload: Payload,
}

impl TimeInterval {
    pub fn new(start: impl Into<Offset>, stop: impl Into<Offset>) -> IntervalResult<Self> {
        Self::with_payload(start, stop, Payload::new())
    }

    pub fn with_payload(
        start: impl Into<Offset>,
        stop: impl Into<Offset>,
        payload: Payload,
    ) -> IntervalResult<Self> {
        let (start, stop) = (start.into(), stop.into());
        if stop < start {
            return Err(IntervalError::InvertedInterval { start, stop });
        }
        Ok(Self {
            start,
            stop,
            payload,
        })
    }

    /// Same payload, new bounds. Internal shortcut for transforms that
    /// already know the bounds are ordered.
    fn with_bounds(&self, start: Offset, stop: Offset) -> Self {
        debug_assert!(start <= stop);
        Self {
            start,
            stop,
            payload: self.payload.clone(),
        }
    }

    pub fn start(&self) -> Offset {
        self.start
    }

    pub fn stop(&self) -> Offset {
        self.stop
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Builder-style payload entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn duration(&self) -> Duration {
        self.start.distance_to(&self.stop)
    }

    /// Translate both bounds by `delta`.
    pub fn shift_by(&self, delta: Fraction) -> Self {
        self.with_bounds(self.start + delta, self.stop + delta)
    }

    /// Translate so the span starts at `offset`.
    pub fn shift_to(&self, offset: impl Into<Offset>) -> Self {
        let offset = offset.into();
        let delta = offset - self.start;
        self.with_bounds(offset, self.stop + delta.get())
    }

    /// Multiply the span's own duration by `ratio`, keeping the start.
    pub fn scale_by(&self, ratio: Fraction) -> IntervalResult<Self> {
        if ratio <= Fraction::from(0) {
            return Err(IntervalError::NonPositiveRatio(ratio));
        }
        let stop = self.start + self.duration() * ratio;
        Ok(self.with_bounds(self.start, stop))
    }

    /// Stretch or shrink the span to `duration`, keeping the start.
    pub fn scale_to(&self, duration: Duration) -> Self {
        self.with_bounds(self.start, self.start + duration)
    }

    /// One interval when `offset` lies outside the open span, two
    /// otherwise. Both halves keep a copy of the payload.
    pub fn split_at(&self, offset: impl Into<Offset>) -> Vec<Self> {
        let offset = offset.into();
        if self.start < offset && offset < self.stop {
            vec![
                self.with_bounds(self.start, offset),
                self.with_bounds(offset, self.stop),
            ]
        } else {
            vec![self.clone()]
        }
    }

    /// Closed-overlap test: tangency at a bound counts.
    pub fn is_intersecting_or_tangent_to(&self, other: &Self) -> bool {
        self.start <= other.stop && other.start <= self.stop
    }

    /// True if the spans only touch at a single bound.
    pub fn is_tangent_to(&self, other: &Self) -> bool {
        self.stop == other.start || other.stop == self.start
    }
}
