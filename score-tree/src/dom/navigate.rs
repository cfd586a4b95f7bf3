//! Leaf-order navigation.
//!
//! `next_leaf` and `previous_leaf` are computed by climbing to the
//! nearest ancestor with a later (earlier) sibling and descending from
//! there, O(depth) per step; nothing is stored. Linear scans should
//! use [`Score::leaves`] once instead of chaining single steps.

use itertools::Itertools;

use super::component::{Component, ComponentId};
use super::score::Score;
use super::TreeResult;

impl Score {
    /// Every leaf under `root` in document order, via an explicit
    /// stack. `root` itself counts when it is a leaf.
    pub fn leaves(&self, root: ComponentId) -> TreeResult<Vec<ComponentId>> {
        self.node(root)?;
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match &self.nodes[id.0].body {
                Component::Leaf(_) => out.push(id),
                Component::Container(container) => {
                    stack.extend(container.children.iter().rev());
                }
            }
        }
        Ok(out)
    }

    /// First leaf under `id` in document order; `None` for an empty
    /// container.
    pub fn first_leaf(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(match &self.node(id)?.body {
            Component::Leaf(_) => Some(id),
            Component::Container(container) => {
                let mut found = None;
                for &child in &container.children {
                    found = self.first_leaf(child)?;
                    if found.is_some() {
                        break;
                    }
                }
                found
            }
        })
    }

    /// Last leaf under `id` in document order.
    pub fn last_leaf(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(match &self.node(id)?.body {
            Component::Leaf(_) => Some(id),
            Component::Container(container) => {
                let mut found = None;
                for &child in container.children.iter().rev() {
                    found = self.last_leaf(child)?;
                    if found.is_some() {
                        break;
                    }
                }
                found
            }
        })
    }

    pub fn next_sibling(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.sibling_at(id, 1)?)
    }

    pub fn previous_sibling(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.sibling_at(id, -1)?)
    }

    fn sibling_at(&self, id: ComponentId, step: isize) -> TreeResult<Option<ComponentId>> {
        let parent = match self.node(id)?.parent {
            Some(parent) => parent,
            None => return Ok(None),
        };
        let siblings = self.children(parent)?;
        let pos = siblings
            .iter()
            .position(|&sibling| sibling == id)
            .expect("attached component is in its parent's list");
        let target = pos as isize + step;
        if target < 0 {
            return Ok(None);
        }
        Ok(siblings.get(target as usize).copied())
    }

    /// Next leaf in document order, across container boundaries.
    /// `None` past the end of the tree.
    pub fn next_leaf(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        let mut cur = id;
        loop {
            let parent = match self.node(cur)?.parent {
                Some(parent) => parent,
                None => return Ok(None),
            };
            let siblings = self.children(parent)?;
            let pos = siblings
                .iter()
                .position(|&sibling| sibling == cur)
                .expect("attached component is in its parent's list");
            for &later in &siblings[pos + 1..] {
                if let Some(leaf) = self.first_leaf(later)? {
                    return Ok(Some(leaf));
                }
            }
            cur = parent;
        }
    }

    /// Previous leaf in document order. `None` before the start.
    pub fn previous_leaf(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        let mut cur = id;
        loop {
            let parent = match self.node(cur)?.parent {
                Some(parent) => parent,
                None => return Ok(None),
            };
            let siblings = self.children(parent)?;
            let pos = siblings
                .iter()
                .position(|&sibling| sibling == cur)
                .expect("attached component is in its parent's list");
            for &earlier in siblings[..pos].iter().rev() {
                if let Some(leaf) = self.last_leaf(earlier)? {
                    return Ok(Some(leaf));
                }
            }
            cur = parent;
        }
    }

    /// True when `ids` names consecutive leaves of the tree, in order,
    /// with nothing in between.
    pub fn are_contiguous_in_leaf_order(&self, ids: &[ComponentId]) -> TreeResult<bool> {
        for &id in ids {
            if !self.is_leaf(id)? {
                return Ok(false);
            }
        }
        for (&a, &b) in ids.iter().tuple_windows() {
            if self.next_leaf(a)? != Some(b) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
