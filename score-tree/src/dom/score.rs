//! Arena owning every component and every spanner of one score.

use std::collections::HashSet;

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentId, Container, Leaf};
use super::spanner::SpannerData;
use super::{TreeError, TreeResult};
use crate::intervals::{TimeInterval, TimeIntervalTree};
use crate::primitives::{Duration, Offset};

/// Which side of an anchor a splice lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ComponentNode {
    pub parent: Option<ComponentId>,
    pub body: Component,
}

/// The arena. Owns components and spanners; hands out stable ids.
///
/// A component is either `detached` (no parent) or `attached` (present
/// exactly once in its parent's child list); the only transitions are
/// [`Score::attach`], [`Score::detach`] and [`Score::splice`]. Each
/// mutation validates its whole contract first and only then touches
/// links, always detaching from the old owner before attaching to the
/// new one, so no half-updated state is ever observable.
///
/// # Example
/// ```
/// use score_tree::dom::{Container, Leaf, Score};
/// use score_tree::primitives::Duration;
///
/// let mut score = Score::new();
/// let voice = score.add_container(Container::new());
/// let a = score.add_leaf(Leaf::note(Duration::new(1, 4)).unwrap());
/// let b = score.add_leaf(Leaf::note(Duration::new(1, 4)).unwrap());
/// score.append(&[a, b], voice).unwrap();
/// assert_eq!(score.duration(voice).unwrap(), Duration::new(1, 2));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub(crate) nodes: Vec<ComponentNode>,
    pub(crate) spanners: Vec<Option<SpannerData>>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, body: Component) -> ComponentId {
        let id = ComponentId(self.nodes.len());
        self.nodes.push(ComponentNode { parent: None, body });
        id
    }

    /// Add a detached leaf to the arena.
    pub fn add_leaf(&mut self, leaf: Leaf) -> ComponentId {
        self.push(Component::Leaf(leaf))
    }

    /// Add a detached, empty container to the arena.
    pub fn add_container(&mut self, container: Container) -> ComponentId {
        self.push(Component::Container(container))
    }

    pub(crate) fn node(&self, id: ComponentId) -> TreeResult<&ComponentNode> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownComponent(id))
    }

    pub fn component(&self, id: ComponentId) -> TreeResult<&Component> {
        Ok(&self.node(id)?.body)
    }

    pub fn parent(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.node(id)?.parent)
    }

    /// A leaf's children are the empty run.
    pub fn children(&self, id: ComponentId) -> TreeResult<&[ComponentId]> {
        Ok(match &self.node(id)?.body {
            Component::Leaf(_) => &[],
            Component::Container(container) => &container.children,
        })
    }

    pub fn leaf(&self, id: ComponentId) -> TreeResult<&Leaf> {
        self.component(id)?
            .as_leaf()
            .ok_or(TreeError::NotALeaf(id))
    }

    pub fn leaf_mut(&mut self, id: ComponentId) -> TreeResult<&mut Leaf> {
        self.node(id)?;
        match &mut self.nodes[id.0].body {
            Component::Leaf(leaf) => Ok(leaf),
            Component::Container(_) => Err(TreeError::NotALeaf(id)),
        }
    }

    pub fn container(&self, id: ComponentId) -> TreeResult<&Container> {
        self.component(id)?
            .as_container()
            .ok_or(TreeError::NotAContainer(id))
    }

    pub fn is_leaf(&self, id: ComponentId) -> TreeResult<bool> {
        Ok(self.component(id)?.is_leaf())
    }

    /// True when `maybe_ancestor` lies on the parent chain of `id`,
    /// `id` itself included.
    fn is_ancestor_or_self(&self, maybe_ancestor: ComponentId, id: ComponentId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == maybe_ancestor {
                return true;
            }
            cur = self.nodes[c.0].parent;
        }
        false
    }

    /// Validate a selection destined for `parent`: every id known,
    /// no duplicates, none an ancestor of the target.
    fn check_attachable(
        &self,
        components: &[ComponentId],
        parent: ComponentId,
    ) -> TreeResult<()> {
        if components.is_empty() {
            return Err(TreeError::EmptySelection);
        }
        let mut seen = HashSet::new();
        for &c in components {
            self.node(c)?;
            if !seen.insert(c) {
                return Err(TreeError::DuplicateComponent(c));
            }
            if self.is_ancestor_or_self(c, parent) {
                return Err(TreeError::WouldCreateCycle(c));
            }
        }
        Ok(())
    }

    /// Insert `components` into `parent`'s child list at `index`.
    ///
    /// Components attached elsewhere are detached first, fully, before
    /// any link to the new parent is made. Attaching a component to its
    /// own descendant is refused before anything is touched.
    pub fn attach(
        &mut self,
        components: &[ComponentId],
        parent: ComponentId,
        index: usize,
    ) -> TreeResult<()> {
        let len = self.container(parent)?.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds {
                container: parent,
                index,
                len,
            });
        }
        self.check_attachable(components, parent)?;

        for &c in components {
            self.detach(c)?;
        }
        // a same-parent reattach may have shortened the child list
        let len = self.container(parent)?.children.len();
        let index = index.min(len);
        for (k, &c) in components.iter().enumerate() {
            match &mut self.nodes[parent.0].body {
                Component::Container(container) => container.children.insert(index + k, c),
                Component::Leaf(_) => unreachable!("attach target was checked as a container"),
            }
            self.nodes[c.0].parent = Some(parent);
        }
        log::debug!("attached {} component(s) under {}", components.len(), parent);
        Ok(())
    }

    /// Append `components` at the end of `parent`'s child list.
    pub fn append(&mut self, components: &[ComponentId], parent: ComponentId) -> TreeResult<()> {
        let index = self.container(parent)?.children.len();
        self.attach(components, parent, index)
    }

    /// Remove `id` from its parent's child list and trim its subtree's
    /// leaves out of every spanner. A no-op on a detached component.
    pub fn detach(&mut self, id: ComponentId) -> TreeResult<()> {
        let parent = match self.node(id)?.parent {
            Some(parent) => parent,
            None => return Ok(()),
        };
        let removed: HashSet<ComponentId> = self.leaves(id)?.into_iter().collect();
        match &mut self.nodes[parent.0].body {
            Component::Container(container) => {
                container.children.retain(|&child| child != id);
            }
            Component::Leaf(_) => unreachable!("a leaf never owns children"),
        }
        self.nodes[id.0].parent = None;
        self.trim_spanners(&removed);
        Ok(())
    }

    /// Deep copy: new identity for every node of the subtree, detached
    /// and claimed by no spanner. The original is untouched.
    pub fn copy(&mut self, id: ComponentId) -> TreeResult<ComponentId> {
        let body = self.component(id)?.clone();
        match body {
            Component::Leaf(leaf) => Ok(self.push(Component::Leaf(leaf))),
            Component::Container(container) => {
                let source_children = container.children.clone();
                let mut shell = container;
                shell.children.clear();
                let new_id = self.push(Component::Container(shell));
                for child in source_children {
                    let copied = self.copy(child)?;
                    self.nodes[copied.0].parent = Some(new_id);
                    match &mut self.nodes[new_id.0].body {
                        Component::Container(c) => c.children.push(copied),
                        Component::Leaf(_) => unreachable!("copy shell stays a container"),
                    }
                }
                Ok(new_id)
            }
        }
    }

    /// Insert `components` immediately adjacent to `anchor` in its
    /// parent. With `grow_spanners`, every spanner claiming the anchor
    /// absorbs the new leaves at the matching side of its membership.
    pub fn splice(
        &mut self,
        anchor: ComponentId,
        components: &[ComponentId],
        side: Side,
        grow_spanners: bool,
    ) -> TreeResult<()> {
        let parent = self
            .parent(anchor)?
            .ok_or(TreeError::DetachedComponent(anchor))?;
        if components.contains(&anchor) {
            return Err(TreeError::DuplicateComponent(anchor));
        }
        self.check_attachable(components, parent)?;

        for &c in components {
            self.detach(c)?;
        }
        let anchor_pos = self
            .container(parent)?
            .children
            .iter()
            .position(|&child| child == anchor)
            .expect("anchor was attached to this parent");
        let at = match side {
            Side::Left => anchor_pos,
            Side::Right => anchor_pos + 1,
        };
        for (k, &c) in components.iter().enumerate() {
            match &mut self.nodes[parent.0].body {
                Component::Container(container) => container.children.insert(at + k, c),
                Component::Leaf(_) => unreachable!("splice parent is a container"),
            }
            self.nodes[c.0].parent = Some(parent);
        }

        if grow_spanners {
            let mut new_leaves = Vec::new();
            for &c in components {
                new_leaves.extend(self.leaves(c)?);
            }
            self.grow_spanners_at(anchor, &new_leaves, side);
        }
        log::debug!(
            "spliced {} component(s) {:?} of {}",
            components.len(),
            side,
            anchor
        );
        Ok(())
    }

    /// Remove a container, promoting its children into its place.
    pub fn extract(&mut self, id: ComponentId) -> TreeResult<()> {
        self.container(id)?;
        let parent = self
            .parent(id)?
            .ok_or(TreeError::DetachedComponent(id))?;
        let children = match &mut self.nodes[id.0].body {
            Component::Container(container) => std::mem::take(&mut container.children),
            Component::Leaf(_) => unreachable!("checked as a container above"),
        };
        match &mut self.nodes[parent.0].body {
            Component::Container(container) => {
                let pos = container
                    .children
                    .iter()
                    .position(|&child| child == id)
                    .expect("attached component is in its parent's list");
                container.children.remove(pos);
                for (k, &child) in children.iter().enumerate() {
                    container.children.insert(pos + k, child);
                }
            }
            Component::Leaf(_) => unreachable!("a leaf never owns children"),
        }
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Product of the multipliers on the parent chain, own multiplier
    /// excluded.
    pub fn prolation(&self, id: ComponentId) -> TreeResult<Fraction> {
        let mut factor = Fraction::from(1);
        let mut cur = self.node(id)?.parent;
        while let Some(c) = cur {
            if let Some(m) = self.nodes[c.0].body.multiplier() {
                factor = factor * m;
            }
            cur = self.nodes[c.0].parent;
        }
        Ok(factor)
    }

    /// Duration before any enclosing container scaling: a leaf's
    /// multiplied written duration, a container's scaled content sum.
    pub fn preprolated_duration(&self, id: ComponentId) -> TreeResult<Duration> {
        match &self.node(id)?.body {
            Component::Leaf(leaf) => Ok(leaf.preprolated_duration()),
            Component::Container(container) => {
                let mut sum = Duration::zero();
                for &child in &container.children {
                    sum += self.preprolated_duration(child)?;
                }
                Ok(match container.multiplier() {
                    Some(m) => sum * m,
                    None => sum,
                })
            }
        }
    }

    /// Fully scaled (prolated) duration.
    pub fn duration(&self, id: ComponentId) -> TreeResult<Duration> {
        Ok(self.preprolated_duration(id)? * self.prolation(id)?)
    }

    /// Offset of the component's start, walking preceding siblings up
    /// the parent chain. Computed on demand, never cached.
    pub fn start_offset(&self, id: ComponentId) -> TreeResult<Offset> {
        match self.node(id)?.parent {
            None => Ok(Offset::from(0)),
            Some(parent) => {
                let mut offset = self.start_offset(parent)?;
                let scale = self.prolation(id)?;
                for &sibling in self.children(parent)? {
                    if sibling == id {
                        break;
                    }
                    offset = offset + self.preprolated_duration(sibling)? * scale;
                }
                Ok(offset)
            }
        }
    }

    pub fn stop_offset(&self, id: ComponentId) -> TreeResult<Offset> {
        Ok(self.start_offset(id)? + self.duration(id)?)
    }

    /// Project every leaf under `root` into a half-open interval and
    /// index the lot. The payload names the source leaf.
    pub fn leaf_intervals(&self, root: ComponentId) -> TreeResult<TimeIntervalTree> {
        let mut intervals = Vec::new();
        for leaf in self.leaves(root)? {
            let start = self.start_offset(leaf)?;
            let stop = start + self.duration(leaf)?;
            let interval = TimeInterval::new(start, stop)
                .expect("stop never precedes start")
                .with_entry("component", leaf.to_string());
            intervals.push(interval);
        }
        Ok(TimeIntervalTree::new(intervals))
    }
}
