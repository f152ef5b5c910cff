// ============================================================
// Layer 4 — Sample Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<Sample>
// into tensor batches.
//
// Every sample has a query side and a context side, each a list
// of equally long rows once padded:
//
//   kind         query rows        context rows
//   ──────────   ───────────────   ───────────────
//   NodeTree     1 × node_max      tree_max × node_max
//   MaskedTree   tree_max × node   tree_max × node_max
//   Aligned      1 × seq_len       1 × seq_len
//
// so both sides stack into rank-3 tensors [batch, rows, cols].
//
// The batcher always runs `collate` first. For datasets padded
// dataset-wide (or to a fixed length) it changes nothing; for
// deferred datasets it pads each mini-batch to its own maxima,
// so consecutive batches may have different shapes.
//
// The context tensor is always built from the tree side of each
// sample.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::padding::collate;
use crate::domain::sample::Sample;

// ─── TreeBatch ────────────────────────────────────────────────────────────────
/// A batch of samples ready for a model forward pass.
#[derive(Debug, Clone)]
pub struct TreeBatch<B: Backend> {
    /// Node / masked tree / labels, shape [batch_size, rows, cols]
    pub query: Tensor<B, 3, Int>,

    /// Tree / tree / inputs, shape [batch_size, rows, cols]
    pub context: Tensor<B, 3, Int>,
}

// ─── SampleBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SampleBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SampleBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Flatten one side of every sample and reshape to [batch, rows, cols]
    fn stack(&self, sides: Vec<Vec<&[u32]>>) -> Tensor<B, 3, Int> {
        let batch_size = sides.len();
        let rows       = sides.first().map_or(0, |rows| rows.len());
        let cols       = sides.first().and_then(|rows| rows.first()).map_or(0, |row| row.len());

        // Burn uses i32 for Int tensors
        let flat: Vec<i32> = sides
            .iter()
            .flat_map(|rows| rows.iter().flat_map(|row| row.iter().map(|&t| t as i32)))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, rows, cols])
    }
}

impl<B: Backend> Batcher<Sample, TreeBatch<B>> for SampleBatcher<B> {
    /// Steps:
    ///   1. Pad the mini-batch to its own maxima (no-op if pre-padded)
    ///   2. Flatten the query rows of every sample, reshape to rank 3
    ///   3. Same for the context rows
    fn batch(&self, mut items: Vec<Sample>) -> TreeBatch<B> {
        if let Err(e) = collate(&mut items) {
            tracing::error!("Batch collation failed: {}", e);
            panic!("Batch collation failed: {e}");
        }

        let query   = self.stack(items.iter().map(Sample::query_rows).collect());
        let context = self.stack(items.iter().map(Sample::context_rows).collect());

        TreeBatch { query, context }
    }
}
