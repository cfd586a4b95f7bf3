//! Domain model for symbolic music notation.
//!
//! The crate is built from three layers:
//!
//! - [`primitives`]: exact rational time, [`primitives::Offset`] points
//!   and non-negative [`primitives::Duration`] spans, plus the tools for
//!   expressing spans as notated symbols.
//! - [`intervals`]: a standalone interval index over raw offsets,
//!   [`intervals::TimeInterval`] values stored in an augmented red-black
//!   [`intervals::TimeIntervalTree`] for temporal range queries.
//! - [`dom`]: the mutable music tree, leaves and containers owned by a
//!   [`dom::Score`] arena, with navigation, copy and split semantics, and
//!   spanners binding ordered runs of leaves.
//!
//! All time arithmetic is exact; nothing in the crate touches floating
//! point.

pub mod dom;
pub mod intervals;
pub mod primitives;
