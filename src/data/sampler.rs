// ============================================================
// Layer 4 — Sample Builder
// ============================================================
// Turns each SampleIndex into a Sample by reading the target's
// tree through the injected tokenizers.
//
// For the plain variant, per index (position p, tree t):
//
//   1. resolve the node at path[p] of tree t (fresh every time)
//   2. node_tokens = tokenize_node(node)
//   3. guard       = tree.mask([node])          ┐ the tree is
//   4. tree_tokens = tokenize_tree(guard)       │ exclusively
//   5. drop(guard)                              ┘ borrowed here
//   6. track node_max / tree_max
//
// The masked-tree variant tokenizes the tree once unmasked (the
// target) and once with the whole index bundle masked (the
// input). The sequence-aligned variant uses an affected-mask
// (target + ancestors) and one combined tokenizer call whose two
// outputs must be the same length.
//
// Samples are built strictly one after another: a mask is a
// visible mutation of a shared tree, and the guard's &mut borrow
// is what keeps two samples from ever overlapping on one tree.

use crate::domain::error::{DatasetError, Result};
use crate::domain::mask::MaskKind;
use crate::domain::sample::{Sample, SampleIndex, SampleShape};
use crate::domain::traits::Tokenizers;
use crate::domain::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStrategy {
    /// (node, tree with node masked)
    NodeVsTree,

    /// (tree with bundle masked, tree)
    MaskedTree,

    /// (labels, inputs) from an affected-mask, equal length
    Aligned,
}

impl SampleStrategy {
    /// Build the sample for one index and fold its lengths into `shape`.
    pub fn build(
        &self,
        forest:     &mut [Tree],
        index:      &SampleIndex,
        tokenizers: &Tokenizers<'_>,
        shape:      &mut SampleShape,
    ) -> Result<Sample> {
        let (tree, targets) = resolve(forest, index)?;

        let sample = match self {
            SampleStrategy::NodeVsTree => {
                let node = tokenizers.node.tokenize_node(tree.node(targets[0]));
                let tree_tokens = {
                    let masked = tree.mask(&targets[..1], MaskKind::SelfOnly);
                    tokenizers.tree.tokenize_tree(&masked)
                };
                Sample::NodeTree { node, tree: tree_tokens }
            }

            SampleStrategy::MaskedTree => {
                let unmasked = tokenizers.tree.tokenize_tree(tree);
                let masked   = {
                    let guard = tree.mask(&targets, MaskKind::SelfOnly);
                    tokenizers.tree.tokenize_tree(&guard)
                };
                Sample::MaskedTree { masked, tree: unmasked }
            }

            SampleStrategy::Aligned => {
                let (node, sequence) = {
                    let guard = tree.mask(&targets[..1], MaskKind::Affected);
                    tokenizers.aligned.tokenize_aligned(&guard)
                };
                if node.len() != sequence.len() {
                    return Err(DatasetError::AlignmentViolation {
                        tree_id:  index.tree_id,
                        node_len: node.len(),
                        tree_len: sequence.len(),
                    });
                }
                Sample::Aligned { node, tree: sequence }
            }
        };

        shape.observe_sample(&sample);
        Ok(sample)
    }
}

/// Look up the index's tree and the node ids at its positions
/// in the tree's current path.
fn resolve<'f>(forest: &'f mut [Tree], index: &SampleIndex) -> Result<(&'f mut Tree, Vec<NodeId>)> {
    let tree = match forest.get_mut(index.tree_id) {
        Some(tree) => tree,
        None => {
            return Err(DatasetError::StaleIndex {
                tree_id:  index.tree_id,
                position: index.position,
                path_len: 0,
            })
        }
    };

    let mut targets = Vec::with_capacity(index.span);
    for position in index.positions() {
        match tree.id_at(position) {
            Some(id) => targets.push(id),
            None => {
                return Err(DatasetError::StaleIndex {
                    tree_id:  index.tree_id,
                    position,
                    path_len: tree.len(),
                })
            }
        }
    }

    if targets.is_empty() {
        return Err(DatasetError::StaleIndex {
            tree_id:  index.tree_id,
            position: index.position,
            path_len: tree.len(),
        });
    }

    Ok((tree, targets))
}

/// Build one sample per index, in index order.
/// Returns the samples and the maxima seen across all of them.
pub fn build_samples(
    forest:     &mut [Tree],
    indexes:    &[SampleIndex],
    strategy:   SampleStrategy,
    tokenizers: &Tokenizers<'_>,
) -> Result<(Vec<Sample>, SampleShape)> {
    let mut shape   = SampleShape::default();
    let mut samples = Vec::with_capacity(indexes.len());

    for (i, index) in indexes.iter().enumerate() {
        samples.push(strategy.build(forest, index, tokenizers, &mut shape)?);

        if (i + 1) % 1000 == 0 {
            tracing::debug!("Built {}/{} samples", i + 1, indexes.len());
        }
    }

    tracing::info!(
        "Built {} samples with {:?} (node_max={}, tree_max={})",
        samples.len(),
        strategy,
        shape.node_max,
        shape.tree_max,
    );

    Ok((samples, shape))
}
