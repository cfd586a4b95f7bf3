//! Splitting leaves at rational offsets.
//!
//! A split point that does not land on an assignable boundary never
//! truncates: the affected side is decomposed into the minimal run of
//! assignable leaves, tied together when pitched, so the preprolated
//! total always survives exactly.

use super::component::ComponentId;
use super::score::{Score, Side};
use super::spanner::SpannerKind;
use super::{TreeError, TreeResult};
use crate::primitives::Duration;

/// Flags steering what happens around each split point.
#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    /// Tie the two pitched leaves flanking a split point.
    pub tie_split_notes: bool,
    /// Tie the two unpitched leaves flanking a split point.
    pub tie_split_rests: bool,
    /// Fracture every spanner at the split point.
    pub fracture_spanners: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            tie_split_notes: true,
            tie_split_rests: false,
            fracture_spanners: false,
        }
    }
}

/// Split `leaf` at a prolated `offset` from its start.
///
/// Returns the left and right runs of leaves. At or outside the leaf's
/// bounds nothing changes: `([], [leaf])` at zero, `([leaf], [])` past
/// the end. An interior split copies the leaf, splices the copy to the
/// right with growing spanners, rewrites both sides' durations and
/// redistributes grace music: before-grace stays with the left edge,
/// after-grace with the right edge, and no interior piece carries any.
pub fn split_leaf_at_offset(
    score: &mut Score,
    leaf: ComponentId,
    offset: Duration,
    options: &SplitOptions,
) -> TreeResult<(Vec<ComponentId>, Vec<ComponentId>)> {
    let multiplied = score.leaf(leaf)?.preprolated_duration();
    let prolation = score.prolation(leaf)?;
    let preprolated = Duration::from_fraction(offset.get() / prolation)
        .expect("non-negative offset over a positive prolation");

    if preprolated.is_zero() {
        return Ok((Vec::new(), vec![leaf]));
    }
    if multiplied <= preprolated {
        return Ok((vec![leaf], Vec::new()));
    }
    score
        .parent(leaf)?
        .ok_or(TreeError::DetachedComponent(leaf))?;

    let new_leaf = score.copy(leaf)?;
    score.splice(leaf, &[new_leaf], Side::Right, true)?;
    score.leaf_mut(leaf)?.after_grace = None;
    score.leaf_mut(new_leaf)?.grace = None;

    let left_list = set_preprolated_duration(score, leaf, preprolated)?;
    let right_list = set_preprolated_duration(score, new_leaf, multiplied - preprolated)?;
    if right_list.len() > 1 {
        let moved = score.leaf_mut(right_list[0])?.after_grace.take();
        score
            .leaf_mut(*right_list.last().expect("right run is non-empty"))?
            .after_grace = moved;
    }

    let left_edge = *left_list.last().expect("left run is non-empty");
    let right_edge = right_list[0];

    if options.fracture_spanners {
        for spanner in score.spanners_claiming(left_edge) {
            if !score.is_last_in_spanner(spanner, left_edge)? {
                score.fracture_spanner(spanner, left_edge, Side::Right)?;
            }
        }
    }

    let pitched = score.leaf(left_edge)?.is_pitched();
    if (pitched && options.tie_split_notes) || (!pitched && options.tie_split_rests) {
        score.attach_spanner(SpannerKind::Tie, &[left_edge, right_edge])?;
    }

    log::debug!(
        "split {} into {} + {} leaf(s)",
        leaf,
        left_list.len(),
        right_list.len()
    );
    Ok((left_list, right_list))
}

/// Split `leaf` into consecutive pieces of the given prolated
/// `durations`. With `cyclic`, the pattern repeats until the leaf is
/// exhausted; either way a remainder becomes the final piece. Each
/// returned group is one piece, possibly a tie chain.
pub fn split_leaf_at_offsets(
    score: &mut Score,
    leaf: ComponentId,
    durations: &[Duration],
    cyclic: bool,
    options: &SplitOptions,
) -> TreeResult<Vec<Vec<ComponentId>>> {
    score.leaf(leaf)?;
    if durations.is_empty() {
        return Ok(vec![vec![leaf]]);
    }
    if durations.iter().any(Duration::is_zero) {
        return Err(TreeError::ZeroSplitDuration);
    }

    let mut groups = Vec::new();
    let mut rest = vec![leaf];
    let mut idx = 0;
    loop {
        let piece_duration = if cyclic {
            durations[idx % durations.len()]
        } else if idx < durations.len() {
            durations[idx]
        } else {
            break;
        };
        idx += 1;
        let remaining = chain_duration(score, &rest)?;
        if remaining <= piece_duration {
            break;
        }
        let (piece, tail) = split_chain(score, rest, piece_duration, options)?;
        groups.push(piece);
        rest = tail;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    Ok(groups)
}

fn chain_duration(score: &Score, chain: &[ComponentId]) -> TreeResult<Duration> {
    let mut sum = Duration::zero();
    for &id in chain {
        sum += score.duration(id)?;
    }
    Ok(sum)
}

/// Cut a run of leaves at a prolated offset from the run's start,
/// splitting the leaf the offset lands inside.
fn split_chain(
    score: &mut Score,
    chain: Vec<ComponentId>,
    offset: Duration,
    options: &SplitOptions,
) -> TreeResult<(Vec<ComponentId>, Vec<ComponentId>)> {
    let mut acc = Duration::zero();
    for (i, &id) in chain.iter().enumerate() {
        if acc == offset {
            return Ok((chain[..i].to_vec(), chain[i..].to_vec()));
        }
        let duration = score.duration(id)?;
        if offset < acc + duration {
            let (split_left, split_right) =
                split_leaf_at_offset(score, id, offset - acc, options)?;
            let mut left = chain[..i].to_vec();
            left.extend(split_left);
            let mut right = split_right;
            right.extend_from_slice(&chain[i + 1..]);
            return Ok((left, right));
        }
        acc += duration;
    }
    Ok((chain, Vec::new()))
}

/// Rewrite a leaf so its preprolated duration equals `target`,
/// spawning a tie chain when one symbol can not carry it.
///
/// An assignable target lands on the leaf itself. A binary target
/// decomposes into assignable pieces spliced after the leaf, tied
/// together when pitched (rest chains stay untied). Anything else
/// keeps one leaf and preserves the total through the multiplier.
fn set_preprolated_duration(
    score: &mut Score,
    leaf: ComponentId,
    target: Duration,
) -> TreeResult<Vec<ComponentId>> {
    if target.is_assignable() {
        let l = score.leaf_mut(leaf)?;
        l.set_multiplier(None)?;
        l.set_written_duration(target)?;
        return Ok(vec![leaf]);
    }
    if target.is_binary() {
        let parts = target.decompose();
        {
            let l = score.leaf_mut(leaf)?;
            l.set_multiplier(None)?;
            l.set_written_duration(parts[0])?;
        }
        let mut chain = vec![leaf];
        let mut prev = leaf;
        for &part in &parts[1..] {
            let piece = score.copy(leaf)?;
            {
                let p = score.leaf_mut(piece)?;
                p.set_written_duration(part)?;
                p.grace = None;
                p.after_grace = None;
            }
            score.splice(prev, &[piece], Side::Right, true)?;
            chain.push(piece);
            prev = piece;
        }
        if score.leaf(leaf)?.is_pitched() && chain.len() > 1 {
            score.attach_spanner(SpannerKind::Tie, &chain)?;
        }
        return Ok(chain);
    }
    let l = score.leaf_mut(leaf)?;
    let written = l.written_duration();
    l.set_multiplier(Some(target / written))?;
    Ok(vec![leaf])
}
