// ============================================================
// Layer 4 — Tree Reduction
// ============================================================
// Some pages have thousands of nodes. Before sampling, each tree
// is shrunk in place by one of two strategies:
//
//   Random { goal_size }
//     Repeatedly pick a uniformly random path position, never
//     the last one (the root), detach that node and rebuild the
//     path, until the path has at most goal_size nodes.
//     Detaching splices the node's children into its parent, so
//     every step removes exactly one node and the tree stays
//     connected: the result has exactly goal_size nodes.
//
//   Depth { max_depth }
//     Cut every node deeper than max_depth (root depth = 0).
//
// Cost: every removal rebuilds the whole path, O(size²) per tree
// in the worst case. The path length is re-read each iteration
// because each removal shifts every later position.
//
// Reduction must finish for the whole forest before indexes are
// built; indexes are only valid against the reduced paths.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DatasetError, Result};
use crate::domain::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Reduction {
    Random { goal_size: usize },
    Depth  { max_depth: usize },
}

impl Reduction {
    /// Select a strategy by its configuration name.
    /// Fails before any tree is touched if the name is unknown.
    pub fn from_name(name: &str, goal_size: usize, max_depth: usize) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Reduction::Random { goal_size }),
            "depth"  => Ok(Reduction::Depth  { max_depth }),
            _        => Err(DatasetError::UnknownReduction(name.to_string())),
        }
    }

    /// Reduce one tree; returns how many nodes were removed
    pub fn apply<R: Rng + ?Sized>(&self, tree: &mut Tree, rng: &mut R) -> usize {
        match *self {
            Reduction::Random { goal_size } => random_reduce(tree, goal_size, rng),
            Reduction::Depth  { max_depth } => tree.prune_deeper_than(max_depth),
        }
    }
}

/// Remove random non-root nodes until at most `goal_size` remain.
/// A goal of 0 is treated as 1 since the root is never removed.
pub fn random_reduce<R: Rng + ?Sized>(tree: &mut Tree, goal_size: usize, rng: &mut R) -> usize {
    let goal   = goal_size.max(1);
    let before = tree.len();

    while tree.len() > goal {
        // Exclusive upper bound len-1 keeps the root (last slot) out of the draw
        let position = rng.gen_range(0..tree.len() - 1);
        if let Some(id) = tree.id_at(position) {
            tree.detach(id);
        }
    }

    before - tree.len()
}

/// Apply `reduction` to every tree in forest order.
/// Returns the total number of removed nodes.
pub fn reduce_forest<R: Rng + ?Sized>(forest: &mut [Tree], reduction: Reduction, rng: &mut R) -> usize {
    let before: usize = forest.iter().map(Tree::len).sum();

    let removed: usize = forest
        .iter_mut()
        .map(|tree| reduction.apply(tree, &mut *rng))
        .sum();

    tracing::info!(
        "Reduced {} trees with {:?}: {} → {} nodes",
        forest.len(),
        reduction,
        before,
        before - removed,
    );

    removed
}
