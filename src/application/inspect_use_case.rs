// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads a saved dataset and runs it through Burn's DataLoader
// on the NdArray (CPU) backend, reporting what a training loop
// would see:
//
//   - variant, padding policy, sample count, padded shape
//   - number of mini-batches
//   - tensor dims of the first batch, query and context side
//
// Batch size comes from the command line, or else from the
// build_config.json saved next to the dataset.

use anyhow::Result;
use burn::backend::NdArray;
use burn::data::dataloader::DataLoaderBuilder;

use crate::data::{batcher::SampleBatcher, dataset::DatasetVariant, padding::Padding};
use crate::domain::sample::SampleShape;
use crate::infra::dataset_store::{DatasetStore, Split};

type InspectBackend = NdArray;

/// What `inspect` found in one saved dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub variant:       DatasetVariant,
    pub padding:       Padding,
    pub samples:       usize,
    pub shape:         SampleShape,
    pub batch_size:    usize,
    pub batches:       usize,
    pub query_dims:    Option<[usize; 3]>,
    pub context_dims:  Option<[usize; 3]>,
}

pub struct InspectUseCase {
    out_dir:    String,
    split:      Split,
    batch_size: Option<usize>,
}

impl InspectUseCase {
    pub fn new(out_dir: String, split: Split, batch_size: Option<usize>) -> Self {
        Self { out_dir, split, batch_size }
    }

    pub fn execute(&self) -> Result<DatasetReport> {
        let store   = DatasetStore::new(&self.out_dir)?;
        let dataset = store.load_dataset(self.split)?;

        let batch_size = match self.batch_size {
            Some(size) => size,
            None       => store.load_config()?.batch_size,
        }
        .max(1);

        tracing::info!(
            "Inspecting {:?} split: {} '{}' samples, shape {:?}",
            self.split,
            dataset.sample_count(),
            dataset.variant(),
            dataset.shape(),
        );

        let mut report = DatasetReport {
            variant:      dataset.variant(),
            padding:      dataset.padding(),
            samples:      dataset.sample_count(),
            shape:        dataset.shape(),
            batch_size,
            batches:      dataset.sample_count().div_ceil(batch_size),
            query_dims:   None,
            context_dims: None,
        };

        let batcher = SampleBatcher::<InspectBackend>::new(Default::default());
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(batch_size)
            .num_workers(1)
            .build(dataset);

        if let Some(batch) = loader.iter().next() {
            report.query_dims   = Some(batch.query.dims());
            report.context_dims = Some(batch.context.dims());
        }

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::build_use_case::{BuildConfig, BuildUseCase};
    use crate::domain::tree::fixtures::flat;
    use tempfile::TempDir;

    fn build(variant: &str, batch_collation: bool) -> (TempDir, TempDir, BuildConfig) {
        let trees = TempDir::new().unwrap();
        let out   = TempDir::new().unwrap();
        let forest = vec![flat(5), flat(3), flat(4)];
        std::fs::write(trees.path().join("f.json"), serde_json::to_string(&forest).unwrap()).unwrap();

        let cfg = BuildConfig {
            forest_dir:       trees.path().to_str().unwrap().to_string(),
            out_dir:          out.path().to_str().unwrap().to_string(),
            variant:          variant.to_string(),
            batch_collation,
            train_proportion: 1.0,
            batch_size:       4,
            ..BuildConfig::default()
        };
        BuildUseCase::new(cfg.clone()).execute().unwrap();
        (trees, out, cfg)
    }

    #[test]
    fn test_first_batch_dims_for_base() {
        let (_trees, _out, cfg) = build("base", false);
        let report = InspectUseCase::new(cfg.out_dir.clone(), Split::Train, None).execute().unwrap();

        assert_eq!(report.samples, 12);
        assert_eq!(report.batch_size, 4);
        assert_eq!(report.batches, 3);
        assert_eq!(report.shape.tree_max, 5);
        assert_eq!(report.query_dims, Some([4, 1, report.shape.node_max]));
        assert_eq!(report.context_dims, Some([4, 5, report.shape.node_max]));
    }

    #[test]
    fn test_deferred_padding_is_collated_per_batch() {
        let (_trees, _out, cfg) = build("base", true);
        let report = InspectUseCase::new(cfg.out_dir.clone(), Split::Train, Some(12)).execute().unwrap();

        assert_eq!(report.padding, Padding::Deferred);
        // One batch holds every sample, so it pads to the widest tree
        assert_eq!(report.batches, 1);
        assert_eq!(report.context_dims.map(|d| d[1]), Some(5));
    }

    #[test]
    fn test_empty_split_has_no_batch() {
        let (_trees, _out, cfg) = build("transformer", false);
        let report = InspectUseCase::new(cfg.out_dir.clone(), Split::Val, None).execute().unwrap();

        assert_eq!(report.samples, 0);
        assert_eq!(report.batches, 0);
        assert_eq!(report.query_dims, None);
    }
}
