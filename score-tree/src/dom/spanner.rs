//! Spanners: annotations claiming ordered, traversal-contiguous runs
//! of leaves.
//!
//! A spanner never owns its leaves; it records ids, and the arena keeps
//! the membership consistent with the tree across mutations. Membership
//! is a sequence, not a set: the formatter downstream treats first,
//! interior and last members differently.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::ComponentId;
use super::score::{Score, Side};
use super::{TreeError, TreeResult};

/// Stable handle to a spanner in the arena. A fractured or detached
/// spanner's handle stops resolving.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpannerId(pub(crate) usize);

impl fmt::Display for SpannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spanner #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpannerKind {
    Tie,
    Beam,
    Slur,
    Hairpin,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SpannerData {
    pub kind: SpannerKind,
    pub members: Vec<ComponentId>,
}

impl Score {
    fn spanner(&self, id: SpannerId) -> TreeResult<&SpannerData> {
        self.spanners
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(TreeError::UnknownSpanner(id))
    }

    fn push_spanner(&mut self, data: SpannerData) -> SpannerId {
        let id = SpannerId(self.spanners.len());
        self.spanners.push(Some(data));
        id
    }

    /// Claim `leaves` under one annotation. The run must be leaf-order
    /// contiguous in the tree; several spanners may claim the same
    /// leaves.
    pub fn attach_spanner(
        &mut self,
        kind: SpannerKind,
        leaves: &[ComponentId],
    ) -> TreeResult<SpannerId> {
        if leaves.is_empty() {
            return Err(TreeError::EmptySelection);
        }
        let mut seen = HashSet::new();
        for &leaf in leaves {
            if !self.is_leaf(leaf)? {
                return Err(TreeError::NotALeaf(leaf));
            }
            if !seen.insert(leaf) {
                return Err(TreeError::DuplicateComponent(leaf));
            }
        }
        if !self.are_contiguous_in_leaf_order(leaves)? {
            return Err(TreeError::NonContiguousSpanner);
        }
        log::debug!("attaching {:?} spanner over {} leaf(s)", kind, leaves.len());
        Ok(self.push_spanner(SpannerData {
            kind,
            members: leaves.to_vec(),
        }))
    }

    pub fn spanner_kind(&self, id: SpannerId) -> TreeResult<SpannerKind> {
        Ok(self.spanner(id)?.kind)
    }

    pub fn spanner_leaves(&self, id: SpannerId) -> TreeResult<&[ComponentId]> {
        Ok(&self.spanner(id)?.members)
    }

    /// Every live spanner, in creation order.
    pub fn live_spanners(&self) -> Vec<SpannerId> {
        self.spanners
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| SpannerId(i)))
            .collect()
    }

    /// Every live spanner claiming `leaf`.
    pub fn spanners_claiming(&self, leaf: ComponentId) -> Vec<SpannerId> {
        self.spanners
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Some(data) if data.members.contains(&leaf) => Some(SpannerId(i)),
                _ => None,
            })
            .collect()
    }

    pub fn is_first_in_spanner(&self, id: SpannerId, leaf: ComponentId) -> TreeResult<bool> {
        Ok(self.spanner(id)?.members.first() == Some(&leaf))
    }

    pub fn is_last_in_spanner(&self, id: SpannerId, leaf: ComponentId) -> TreeResult<bool> {
        Ok(self.spanner(id)?.members.last() == Some(&leaf))
    }

    /// Drop a spanner entirely. Its leaves stay in the tree.
    pub fn detach_spanner(&mut self, id: SpannerId) -> TreeResult<()> {
        self.spanner(id)?;
        self.spanners[id.0] = None;
        Ok(())
    }

    /// Split one spanner into two independent spanners at `leaf`.
    /// `Side::Left` cuts before the leaf, `Side::Right` after it. The
    /// original spanner dies; the two fragments are returned left to
    /// right.
    pub fn fracture_spanner(
        &mut self,
        id: SpannerId,
        leaf: ComponentId,
        direction: Side,
    ) -> TreeResult<(SpannerId, SpannerId)> {
        let data = self.spanner(id)?;
        let pos = data
            .members
            .iter()
            .position(|&member| member == leaf)
            .ok_or(TreeError::NotASpannerMember(leaf))?;
        let cut = match direction {
            Side::Left => pos,
            Side::Right => pos + 1,
        };
        if cut == 0 || cut == data.members.len() {
            return Err(TreeError::EmptySpannerFragment);
        }
        let kind = data.kind;
        let (left, right) = {
            let members = &data.members;
            (members[..cut].to_vec(), members[cut..].to_vec())
        };
        self.spanners[id.0] = None;
        let left_id = self.push_spanner(SpannerData {
            kind,
            members: left,
        });
        let right_id = self.push_spanner(SpannerData {
            kind,
            members: right,
        });
        Ok((left_id, right_id))
    }

    /// Drop `removed` leaves from every membership list, killing
    /// spanners that end up empty. Called on every detach.
    pub(crate) fn trim_spanners(&mut self, removed: &HashSet<ComponentId>) {
        if removed.is_empty() {
            return;
        }
        for slot in &mut self.spanners {
            if let Some(data) = slot {
                data.members.retain(|member| !removed.contains(member));
                if data.members.is_empty() {
                    *slot = None;
                }
            }
        }
    }

    /// Grow every spanner claiming `anchor` with `new_leaves`, placed
    /// on the given side of the anchor's membership position. Called by
    /// splice.
    pub(crate) fn grow_spanners_at(
        &mut self,
        anchor: ComponentId,
        new_leaves: &[ComponentId],
        side: Side,
    ) {
        for slot in &mut self.spanners {
            if let Some(data) = slot {
                if let Some(pos) = data.members.iter().position(|&member| member == anchor) {
                    let at = match side {
                        Side::Left => pos,
                        Side::Right => pos + 1,
                    };
                    for (k, &leaf) in new_leaves.iter().enumerate() {
                        data.members.insert(at + k, leaf);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{ComponentId, Container, Leaf, Score, Side, SpannerKind, TreeError};
    use crate::primitives::Duration;

    fn run_of_leaves(n: usize) -> (Score, ComponentId, Vec<ComponentId>) {
        let mut score = Score::new();
        let voice = score.add_container(Container::new());
        let leaves: Vec<_> = (0..n)
            .map(|_| score.add_leaf(Leaf::note(Duration::new(1, 8)).unwrap()))
            .collect();
        score.append(&leaves, voice).unwrap();
        (score, voice, leaves)
    }

    #[test]
    fn attach_and_query() {
        let (mut score, _, leaves) = run_of_leaves(4);
        let beam = score
            .attach_spanner(SpannerKind::Beam, &leaves[1..4])
            .unwrap();
        assert_eq!(score.spanner_kind(beam).unwrap(), SpannerKind::Beam);
        assert_eq!(score.spanner_leaves(beam).unwrap(), &leaves[1..4]);
        assert!(score.is_first_in_spanner(beam, leaves[1]).unwrap());
        assert!(score.is_last_in_spanner(beam, leaves[3]).unwrap());
        assert!(!score.is_first_in_spanner(beam, leaves[2]).unwrap());
        assert_eq!(score.spanners_claiming(leaves[2]), vec![beam]);
        assert!(score.spanners_claiming(leaves[0]).is_empty());
    }

    #[test]
    fn non_contiguous_runs_are_refused() {
        let (mut score, _, leaves) = run_of_leaves(4);
        let err = score
            .attach_spanner(SpannerKind::Slur, &[leaves[0], leaves[2]])
            .unwrap_err();
        assert_eq!(err, TreeError::NonContiguousSpanner);
        // out of order is just as bad
        let err = score
            .attach_spanner(SpannerKind::Slur, &[leaves[1], leaves[0]])
            .unwrap_err();
        assert_eq!(err, TreeError::NonContiguousSpanner);
        assert!(score.live_spanners().is_empty());
    }

    #[test]
    fn coexisting_spanners_on_same_leaves() {
        let (mut score, _, leaves) = run_of_leaves(3);
        let beam = score.attach_spanner(SpannerKind::Beam, &leaves).unwrap();
        let slur = score.attach_spanner(SpannerKind::Slur, &leaves).unwrap();
        let mut claiming = score.spanners_claiming(leaves[1]);
        claiming.sort();
        assert_eq!(claiming, vec![beam, slur]);
    }

    #[test]
    fn fracture_partitions_membership() {
        let (mut score, _, leaves) = run_of_leaves(4);
        let beam = score.attach_spanner(SpannerKind::Beam, &leaves).unwrap();
        let (left, right) = score
            .fracture_spanner(beam, leaves[2], Side::Left)
            .unwrap();
        assert_eq!(score.spanner_leaves(left).unwrap(), &leaves[..2]);
        assert_eq!(score.spanner_leaves(right).unwrap(), &leaves[2..]);
        // the original is gone
        assert_eq!(
            score.spanner_kind(beam).unwrap_err(),
            TreeError::UnknownSpanner(beam)
        );
        // fragments inherit the kind
        assert_eq!(score.spanner_kind(left).unwrap(), SpannerKind::Beam);
    }

    #[test]
    fn fracture_at_the_edge_is_refused() {
        let (mut score, _, leaves) = run_of_leaves(3);
        let beam = score.attach_spanner(SpannerKind::Beam, &leaves).unwrap();
        assert_eq!(
            score
                .fracture_spanner(beam, leaves[0], Side::Left)
                .unwrap_err(),
            TreeError::EmptySpannerFragment
        );
        assert_eq!(
            score
                .fracture_spanner(beam, leaves[2], Side::Right)
                .unwrap_err(),
            TreeError::EmptySpannerFragment
        );
        // a failed fracture leaves the spanner alive
        assert_eq!(score.spanner_leaves(beam).unwrap(), &leaves[..]);
    }

    #[test]
    fn detach_trims_membership() {
        let (mut score, _, leaves) = run_of_leaves(4);
        let beam = score.attach_spanner(SpannerKind::Beam, &leaves).unwrap();
        score.detach(leaves[1]).unwrap();
        assert_eq!(
            score.spanner_leaves(beam).unwrap(),
            &[leaves[0], leaves[2], leaves[3]]
        );
        // detaching every member kills the spanner
        for &leaf in &[leaves[0], leaves[2], leaves[3]] {
            score.detach(leaf).unwrap();
        }
        assert_eq!(
            score.spanner_leaves(beam).unwrap_err(),
            TreeError::UnknownSpanner(beam)
        );
    }

    #[test]
    fn splice_grows_membership_in_order() {
        let (mut score, _, leaves) = run_of_leaves(3);
        let slur = score.attach_spanner(SpannerKind::Slur, &leaves).unwrap();
        let new_leaf = score.add_leaf(Leaf::note(Duration::new(1, 8)).unwrap());
        score
            .splice(leaves[1], &[new_leaf], Side::Right, true)
            .unwrap();
        assert_eq!(
            score.spanner_leaves(slur).unwrap(),
            &[leaves[0], leaves[1], new_leaf, leaves[2]]
        );
        // membership still matches traversal order
        let members = score.spanner_leaves(slur).unwrap().to_vec();
        assert!(score.are_contiguous_in_leaf_order(&members).unwrap());

        let ignored = score.add_leaf(Leaf::note(Duration::new(1, 8)).unwrap());
        score
            .splice(leaves[0], &[ignored], Side::Left, false)
            .unwrap();
        assert_eq!(score.spanner_leaves(slur).unwrap().len(), 4);
    }
}
