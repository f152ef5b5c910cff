// ============================================================
// Layer 3 — Sampling Targets and Samples
// ============================================================
// SampleIndex  → WHERE a sample comes from: a tree in the forest
//                and one or more consecutive positions in that
//                tree's path
// Sample       → WHAT was produced: a pair of token sequences
// SampleShape  → running maxima used as padding targets
//
// Token sequences come in two ranks:
//   NodeTokens  = Vec<u32>        one node, flat
//   TreeTokens  = Vec<Vec<u32>>   one row per path position
//
// The three sample kinds pair them differently:
//
//   NodeTree    (node: 1-D,  tree: 2-D)   plain variant
//   MaskedTree  (masked: 2-D, tree: 2-D)  masked-tree variant
//   Aligned     (node: 1-D,  tree: 1-D)   sequence-aligned variant
//
// For batching, every sample exposes a "query" side and a
// "context" side as lists of rows; a flat sequence is one row.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Structural filler. Reserved id 0 in every vocabulary.
pub const PAD_VALUE: u32 = 0;

pub type NodeTokens = Vec<u32>;
pub type TreeTokens = Vec<Vec<u32>>;

// ─── SampleIndex ──────────────────────────────────────────────────────────────
/// One sampling target: `span` consecutive path positions starting
/// at `position`, in forest tree `tree_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleIndex {
    pub tree_id:  usize,
    pub position: usize,
    pub span:     usize,
}

impl SampleIndex {
    pub fn single(position: usize, tree_id: usize) -> Self {
        Self { tree_id, position, span: 1 }
    }

    /// Bundle of `span` positions; `span` is raised to at least 1
    pub fn bundle(position: usize, span: usize, tree_id: usize) -> Self {
        Self { tree_id, position, span: span.max(1) }
    }

    /// All path positions covered by this index
    pub fn positions(&self) -> Range<usize> {
        self.position..self.position + self.span
    }
}

// ─── Sample ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sample {
    /// Target node alone vs. the tree with that node masked
    NodeTree   { node: NodeTokens, tree: TreeTokens },

    /// Tree with a bundle of nodes masked vs. the unmasked tree
    MaskedTree { masked: TreeTokens, tree: TreeTokens },

    /// Label sequence vs. input sequence, equal length
    Aligned    { node: NodeTokens, tree: NodeTokens },
}

impl Sample {
    /// First half of the pair as rows (node / masked tree / labels)
    pub fn query_rows(&self) -> Vec<&[u32]> {
        match self {
            Sample::NodeTree   { node, .. }   => vec![node.as_slice()],
            Sample::MaskedTree { masked, .. } => masked.iter().map(Vec::as_slice).collect(),
            Sample::Aligned    { node, .. }   => vec![node.as_slice()],
        }
    }

    /// Second half of the pair as rows (always the tree side)
    pub fn context_rows(&self) -> Vec<&[u32]> {
        match self {
            Sample::NodeTree   { tree, .. } => tree.iter().map(Vec::as_slice).collect(),
            Sample::MaskedTree { tree, .. } => tree.iter().map(Vec::as_slice).collect(),
            Sample::Aligned    { tree, .. } => vec![tree.as_slice()],
        }
    }
}

// ─── SampleShape ──────────────────────────────────────────────────────────────
/// Longest node sequence and longest tree (row count) seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleShape {
    pub node_max: usize,
    pub tree_max: usize,
}

impl SampleShape {
    pub fn observe_node(&mut self, node: &[u32]) {
        self.node_max = self.node_max.max(node.len());
    }

    /// Counts the rows of the tree and every row's length
    pub fn observe_tree(&mut self, tree: &[Vec<u32>]) {
        self.tree_max = self.tree_max.max(tree.len());
        for row in tree {
            self.observe_node(row);
        }
    }

    pub fn observe_sample(&mut self, sample: &Sample) {
        match sample {
            Sample::NodeTree { node, tree } => {
                self.observe_node(node);
                self.observe_tree(tree);
            }
            Sample::MaskedTree { masked, tree } => {
                self.observe_tree(masked);
                self.observe_tree(tree);
            }
            Sample::Aligned { node, tree } => {
                self.observe_node(node);
                self.tree_max = self.tree_max.max(tree.len());
            }
        }
    }

    /// Shape covering every sample in `samples`
    pub fn of<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Self {
        let mut shape = Self::default();
        for s in samples {
            shape.observe_sample(s);
        }
        shape
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_positions() {
        let idx = SampleIndex::bundle(3, 2, 0);
        assert_eq!(idx.positions().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(SampleIndex::bundle(3, 0, 0).span, 1);
    }

    #[test]
    fn test_shape_tracks_rows_and_lengths() {
        let sample = Sample::NodeTree {
            node: vec![1, 2, 3, 4],
            tree: vec![vec![1], vec![1, 2], vec![7, 7, 7]],
        };
        let shape = SampleShape::of([&sample]);
        assert_eq!(shape, SampleShape { node_max: 4, tree_max: 3 });
    }

    #[test]
    fn test_masked_tree_shape_counts_both_sides() {
        let sample = Sample::MaskedTree {
            masked: vec![vec![2, 2, 2, 2, 2]],
            tree:   vec![vec![1], vec![1]],
        };
        let shape = SampleShape::of([&sample]);
        assert_eq!(shape.node_max, 5);
        assert_eq!(shape.tree_max, 2);
    }

    #[test]
    fn test_query_and_context_rows() {
        let sample = Sample::Aligned { node: vec![3, 3, 9], tree: vec![2, 5, 9] };
        assert_eq!(sample.query_rows(), vec![&[3u32, 3, 9][..]]);
        assert_eq!(sample.context_rows().len(), 1);
    }

    #[test]
    fn test_sample_serde_tagging() {
        let sample = Sample::Aligned { node: vec![1], tree: vec![2] };
        let json   = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"kind\":\"aligned\""));
    }
}
