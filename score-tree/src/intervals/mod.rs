//! Temporal interval index, decoupled from the music tree.
//!
//! [`TimeInterval`] values carry raw rational offsets, so the index is
//! usable for any temporal reasoning, not only for score positions.
//! [`TimeIntervalTree`] stores them in an augmented red-black tree and
//! answers range queries by pruning whole subtrees against cached stop
//! extrema.

use fraction::Fraction;
use thiserror::Error;

use crate::primitives::Offset;

pub mod interval;
pub(crate) mod rbtree;
pub mod tree;

pub use interval::{Payload, TimeInterval};
pub use tree::TimeIntervalTree;

#[derive(Debug, Error, PartialEq)]
pub enum IntervalError {
    #[error("interval stop {stop} precedes start {start}")]
    InvertedInterval { start: Offset, stop: Offset },
    #[error("scaling ratio must be positive, got {0}")]
    NonPositiveRatio(Fraction),
    #[error("quantization unit must be positive, got {0}")]
    NonPositiveQuantum(Fraction),
    #[error("can not rescale a tree of zero duration")]
    ZeroDuration,
}

pub type IntervalResult<T> = Result<T, IntervalError>;
