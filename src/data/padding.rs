// ============================================================
// Layer 4 — Padding and Collation
// ============================================================
// Token sequences come out of the sampler ragged. Tensors need
// them rectangular. Three policies exist:
//
//   DatasetWide
//     After every sample is built, pad each node sequence to
//     node_max and each tree to tree_max rows × node_max columns,
//     using the dataset-wide maxima tracked by the sampler.
//
//   Deferred
//     Leave samples ragged. The batcher calls `collate` on each
//     mini-batch, which pads to that batch's own maxima, so batch
//     shapes vary from batch to batch.
//
//   FixedLength { max_seq_len, fill }
//     For flat aligned sequences: keep the LAST max_seq_len
//     tokens, then right-pad to exactly max_seq_len with `fill`
//     (the vocabulary's ignore id, not the pad id).
//
// Padding only ever appends. If a sequence is still longer than
// its target after the append loop, some maximum was computed
// wrongly upstream; that is reported as PaddingOverflow and the
// whole pass stops. Nothing is ever silently cut, except by the
// explicit truncation of FixedLength.

use serde::{Deserialize, Serialize};

use crate::domain::error::{DatasetError, Result};
use crate::domain::sample::{Sample, SampleShape, PAD_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Padding {
    DatasetWide,
    Deferred,
    FixedLength { max_seq_len: usize, fill: u32 },
}

impl Padding {
    /// Pad `samples` in place according to this policy.
    /// `shape` holds the dataset-wide maxima from the sampler.
    pub fn apply(&self, samples: &mut [Sample], shape: SampleShape) -> Result<()> {
        match *self {
            Padding::DatasetWide => {
                for sample in samples.iter_mut() {
                    pad_sample(sample, shape)?;
                }
                tracing::info!(
                    "Padded {} samples to node_max={}, tree_max={}",
                    samples.len(),
                    shape.node_max,
                    shape.tree_max,
                );
            }
            Padding::Deferred => {
                tracing::info!("Padding deferred to batch collation");
            }
            Padding::FixedLength { max_seq_len, fill } => {
                for sample in samples.iter_mut() {
                    match sample {
                        Sample::Aligned { node, tree } => {
                            *node = truncate_and_pad(node, max_seq_len, fill);
                            *tree = truncate_and_pad(tree, max_seq_len, fill);
                        }
                        other => pad_sample(other, shape)?,
                    }
                }
                tracing::info!(
                    "Truncated and padded {} samples to length {}",
                    samples.len(),
                    max_seq_len,
                );
            }
        }
        Ok(())
    }
}

/// Append PAD_VALUE until `node` is `length` long.
pub fn pad_node(node: &mut Vec<u32>, length: usize) -> Result<()> {
    while node.len() < length {
        node.push(PAD_VALUE);
    }
    if node.len() > length {
        return Err(DatasetError::PaddingOverflow { expected: length, actual: node.len() });
    }
    Ok(())
}

/// Pad every row to `node_len`, then append all-PAD rows until
/// the tree has `tree_len` rows.
pub fn pad_tree(tree: &mut Vec<Vec<u32>>, tree_len: usize, node_len: usize) -> Result<()> {
    for row in tree.iter_mut() {
        pad_node(row, node_len)?;
    }
    while tree.len() < tree_len {
        tree.push(vec![PAD_VALUE; node_len]);
    }
    if tree.len() > tree_len {
        return Err(DatasetError::PaddingOverflow { expected: tree_len, actual: tree.len() });
    }
    Ok(())
}

/// Pad one sample up to `shape`, both halves.
pub fn pad_sample(sample: &mut Sample, shape: SampleShape) -> Result<()> {
    match sample {
        Sample::NodeTree { node, tree } => {
            pad_node(node, shape.node_max)?;
            pad_tree(tree, shape.tree_max, shape.node_max)?;
        }
        Sample::MaskedTree { masked, tree } => {
            pad_tree(masked, shape.tree_max, shape.node_max)?;
            pad_tree(tree, shape.tree_max, shape.node_max)?;
        }
        Sample::Aligned { node, tree } => {
            let length = shape.node_max.max(shape.tree_max);
            pad_node(node, length)?;
            pad_node(tree, length)?;
        }
    }
    Ok(())
}

/// Keep the last `max_len` tokens of `seq`, then right-pad with
/// `fill` to exactly `max_len`.
pub fn truncate_and_pad(seq: &[u32], max_len: usize, fill: u32) -> Vec<u32> {
    let start   = seq.len().saturating_sub(max_len);
    let mut out = seq[start..].to_vec();
    out.resize(max_len, fill);
    out
}

/// Batch-local collation: pad every sample of `batch` to the
/// batch's own maxima. Returns the shape the batch was padded to.
///
/// Already-padded samples come through unchanged, since padding
/// to a length a sequence already has is a no-op.
pub fn collate(batch: &mut [Sample]) -> Result<SampleShape> {
    let shape = SampleShape::of(batch.iter());
    for sample in batch.iter_mut() {
        pad_sample(sample, shape)?;
    }
    Ok(shape)
}
