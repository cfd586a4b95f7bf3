//! Component variants: leaves carrying written durations, containers
//! carrying ordered children.

use std::fmt;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::{TreeError, TreeResult};
use crate::primitives::Duration;

/// Stable handle to one component inside a [`super::Score`] arena.
///
/// Handles never move or get reused, so holding one across mutations is
/// always safe; resolving it just may find the component detached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ComponentId(pub(crate) usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component #{}", self.0)
    }
}

/// What a leaf stands for. The core only needs to know whether a leaf
/// carries pitch (notes, chords) or not (rests, skips); pitch content
/// itself belongs to an outer layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafKind {
    Note,
    Rest,
    Chord,
    Skip,
}

impl LeafKind {
    pub fn is_pitched(&self) -> bool {
        matches!(self, Self::Note | Self::Chord)
    }
}

/// A grace note owned by its carrier leaf, outside normal time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraceLeaf {
    pub kind: LeafKind,
    pub written_duration: Duration,
}

/// Grace music hanging off one edge of a leaf. Always present as an
/// explicit optional field of the leaf, never materialized on access.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraceContainer {
    pub leaves: Vec<GraceLeaf>,
}

/// A terminal component: one notated symbol with a written duration.
///
/// # Example
/// ```
/// use score_tree::dom::{Leaf, LeafKind};
/// use score_tree::primitives::Duration;
///
/// let note = Leaf::note(Duration::new(3, 8)).unwrap();
/// assert_eq!(note.preprolated_duration(), Duration::new(3, 8));
/// // 5/8 needs a tie chain, so it is not writable as one leaf
/// assert!(Leaf::new(LeafKind::Note, Duration::new(5, 8)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    written_duration: Duration,
    multiplier: Option<Fraction>,
    pub kind: LeafKind,
    pub grace: Option<GraceContainer>,
    pub after_grace: Option<GraceContainer>,
}

impl Leaf {
    pub fn new(kind: LeafKind, written_duration: Duration) -> TreeResult<Self> {
        if !written_duration.is_assignable() {
            return Err(TreeError::UnassignableDuration(written_duration.get()));
        }
        Ok(Self {
            written_duration,
            multiplier: None,
            kind,
            grace: None,
            after_grace: None,
        })
    }

    pub fn note(written_duration: Duration) -> TreeResult<Self> {
        Self::new(LeafKind::Note, written_duration)
    }

    pub fn rest(written_duration: Duration) -> TreeResult<Self> {
        Self::new(LeafKind::Rest, written_duration)
    }

    pub fn written_duration(&self) -> Duration {
        self.written_duration
    }

    pub fn set_written_duration(&mut self, written_duration: Duration) -> TreeResult<()> {
        if !written_duration.is_assignable() {
            return Err(TreeError::UnassignableDuration(written_duration.get()));
        }
        self.written_duration = written_duration;
        Ok(())
    }

    pub fn multiplier(&self) -> Option<Fraction> {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: Option<Fraction>) -> TreeResult<()> {
        if let Some(m) = multiplier {
            ensure_positive(m)?;
        }
        self.multiplier = multiplier;
        Ok(())
    }

    pub fn is_pitched(&self) -> bool {
        self.kind.is_pitched()
    }

    /// Written duration scaled by the leaf's own multiplier, before any
    /// container prolation applies.
    pub fn preprolated_duration(&self) -> Duration {
        match self.multiplier {
            Some(m) => self.written_duration * m,
            None => self.written_duration,
        }
    }
}

/// A non-terminal component owning an ordered run of children, with an
/// optional rational multiplier scaling its contents (tuplets).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Container {
    multiplier: Option<Fraction>,
    pub(crate) children: Vec<ComponentId>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container scaling its contents, e.g. `2/3` for a triplet.
    pub fn tuplet(multiplier: Fraction) -> TreeResult<Self> {
        ensure_positive(multiplier)?;
        Ok(Self {
            multiplier: Some(multiplier),
            children: Vec::new(),
        })
    }

    pub fn multiplier(&self) -> Option<Fraction> {
        self.multiplier
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }
}

fn ensure_positive(multiplier: Fraction) -> TreeResult<()> {
    match multiplier {
        Fraction::Rational(..) if multiplier > Fraction::from(0) => Ok(()),
        _ => Err(TreeError::NonPositiveMultiplier(multiplier)),
    }
}

/// Closed set of component variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Leaf(Leaf),
    Container(Container),
}

impl Component {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Leaf(_) => None,
            Self::Container(container) => Some(container),
        }
    }

    pub(crate) fn multiplier(&self) -> Option<Fraction> {
        match self {
            Self::Leaf(leaf) => leaf.multiplier(),
            Self::Container(container) => container.multiplier(),
        }
    }
}
