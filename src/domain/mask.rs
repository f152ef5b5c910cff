// ============================================================
// Layer 3 — Scoped Node Masking
// ============================================================
// A sample is built by hiding the target node from the tree
// tokenizer, tokenizing the tree, then un-hiding the node:
//
//   mask(target) ──► tokenize(tree) ──► unmask(target)
//
// Instead of manual set/unset pairs, Tree::mask returns a
// MaskGuard. The guard:
//   - holds the only &mut borrow of the tree, so nothing else
//     can read or mutate the tree while the mask is set
//   - derefs to &Tree, so tokenizers read through it
//   - clears every flag it set when dropped, including when the
//     caller bails out early with `?` or panics
//
// Two kinds of mask exist:
//   SelfOnly  → only the target nodes are hidden
//   Affected  → the targets AND all of their ancestors are hidden

use std::ops::Deref;

use crate::domain::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    SelfOnly,
    Affected,
}

/// Live mask on a tree. Dropping it removes the mask.
pub struct MaskGuard<'a> {
    tree:   &'a mut Tree,
    marked: Vec<NodeId>,
    kind:   MaskKind,
}

impl Tree {
    /// Hide `targets` (and their ancestors for `MaskKind::Affected`)
    /// until the returned guard is dropped.
    pub fn mask(&mut self, targets: &[NodeId], kind: MaskKind) -> MaskGuard<'_> {
        let mut marked = Vec::with_capacity(targets.len());
        for &id in targets {
            marked.push(id);
            if kind == MaskKind::Affected {
                marked.extend(self.ancestors(id));
            }
        }

        for &id in &marked {
            self.node_mut(id).set_mask(kind, true);
        }

        MaskGuard { tree: self, marked, kind }
    }
}

impl MaskGuard<'_> {
    pub fn kind(&self) -> MaskKind {
        self.kind
    }

    /// Every node currently hidden by this guard
    pub fn marked(&self) -> &[NodeId] {
        &self.marked
    }
}

impl Deref for MaskGuard<'_> {
    type Target = Tree;

    fn deref(&self) -> &Tree {
        self.tree
    }
}

impl Drop for MaskGuard<'_> {
    fn drop(&mut self) {
        for &id in &self.marked {
            self.tree.node_mut(id).set_mask(self.kind, false);
        }
    }
}
