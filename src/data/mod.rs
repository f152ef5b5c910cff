// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer turns a forest of DOM trees into fixed-shape
// samples and then into tensor batches.
//
// The pipeline flows in this order:
//
//   JSON tree files
//       │
//       ▼
//   ForestLoader      → reads files, rebuilds each tree's path
//       │
//       ▼
//   reduction         → shrinks oversized trees in place
//       │
//       ▼
//   indexer           → (position, tree) targets, shuffled, capped
//       │
//       ▼
//   sampler           → mask target, tokenize, track max shapes
//       │
//       ▼
//   padding           → pad up / truncate+pad / defer to batch
//       │
//       ▼
//   TreeDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   SampleBatcher     → collates and stacks into tensor batches
//
// The three dataset variants differ only in which index,
// sample and padding strategy they plug into this pipeline
// (see dataset.rs).
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads a forest from a directory of JSON tree files
pub mod loader;

/// Random and depth-bound tree reduction
pub mod reduction;

/// Builds the shuffled list of sampling targets
pub mod indexer;

/// Builds (query, context) token pairs under a mask
pub mod sampler;

/// Dataset-wide padding, batch collation, fixed-length padding
pub mod padding;

/// The configurable dataset pipeline and Burn's Dataset trait
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
