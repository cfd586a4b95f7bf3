//! The mutable music tree.
//!
//! All components live in a [`Score`] arena and refer to each other by
//! stable [`component::ComponentId`] handles: containers own their
//! children's ids, spanners record ordered runs of leaf ids, and parent
//! links point back without owning anything. Every structural mutation
//! goes through the arena's API, which keeps parent pointers and
//! spanner membership consistent in one place.

use fraction::Fraction;
use thiserror::Error;

pub mod component;
pub mod navigate;
pub mod score;
pub mod spanner;
pub mod split;

pub use component::{
    Component, ComponentId, Container, GraceContainer, GraceLeaf, Leaf, LeafKind,
};
pub use score::{Score, Side};
pub use spanner::{SpannerId, SpannerKind};
pub use split::{split_leaf_at_offset, split_leaf_at_offsets, SplitOptions};

#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("attaching {0} under its own descendant would make a cycle")]
    WouldCreateCycle(ComponentId),
    #[error("{0} is not a container")]
    NotAContainer(ComponentId),
    #[error("{0} is not a leaf")]
    NotALeaf(ComponentId),
    #[error("unknown component {0}")]
    UnknownComponent(ComponentId),
    #[error("unknown spanner {0}")]
    UnknownSpanner(SpannerId),
    #[error("{0} appears more than once in the selection")]
    DuplicateComponent(ComponentId),
    #[error("selection is empty")]
    EmptySelection,
    #[error("{0} is not attached to a parent")]
    DetachedComponent(ComponentId),
    #[error("index {index} is out of bounds for {container} of {len} children")]
    IndexOutOfBounds {
        container: ComponentId,
        index: usize,
        len: usize,
    },
    #[error("leaves are not contiguous in leaf order")]
    NonContiguousSpanner,
    #[error("fracturing here would leave an empty spanner")]
    EmptySpannerFragment,
    #[error("{0} is not a member of the spanner")]
    NotASpannerMember(ComponentId),
    #[error("duration {0} is not assignable as a single notated symbol")]
    UnassignableDuration(Fraction),
    #[error("multiplier {0} must be a positive rational")]
    NonPositiveMultiplier(Fraction),
    #[error("split durations must be positive")]
    ZeroSplitDuration,
}

pub type TreeResult<T> = Result<T, TreeError>;
