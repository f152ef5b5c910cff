// ============================================================
// Layer 2 — BuildUseCase
// ============================================================
// Orchestrates one dataset build in order:
//
//   Step 1: Parse variant and reduction names   (fail before any I/O)
//   Step 2: Load the forest                     (Layer 4 - data)
//   Step 3: Reduce every tree                   (Layer 4 - data)
//   Step 4: Build / load the vocabulary         (Layer 6 - infra)
//   Step 5: Index, sample and pad               (Layer 4 - data)
//   Step 6: Split train/validation              (Layer 4 - data)
//   Step 7: Save datasets and config            (Layer 6 - infra)
//   Step 8: Append to the build report          (Layer 6 - infra)
//
// One seeded StdRng drives every random step (reduction, index
// shuffle, split), so the same config over the same forest
// always produces the same datasets.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{DatasetConfig, DatasetVariant, TreeDataset},
    loader::ForestLoader,
    reduction::{reduce_forest, Reduction},
};
use crate::domain::traits::{ForestSource, Tokenizers};
use crate::domain::tree::Tree;
use crate::infra::{
    dataset_store::{DatasetStore, Split},
    report::{BuildReport, BuildSummary},
    tokenizer_store::TokenizerStore,
    vocab_tokenizer::VocabTokenizer,
};

// ─── Build Configuration ─────────────────────────────────────────────────────
// Everything one build needs. Saved next to the datasets as
// build_config.json so a build can be reproduced or inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub forest_dir:        String,
    pub out_dir:           String,
    pub variant:           String,
    pub reduction:         String,
    pub goal_size:         usize,
    pub max_depth:         usize,
    pub index_limit:       Option<usize>,
    pub mask_span:         usize,
    pub batch_collation:   bool,
    pub max_seq_len:       usize,
    pub aligned_goal_size: usize,
    pub key_only:          bool,
    pub vocab_size:        usize,
    pub train_proportion:  f64,
    pub batch_size:        usize,
    pub seed:              u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            forest_dir:        "data/trees".to_string(),
            out_dir:           "datasets".to_string(),
            variant:           "base".to_string(),
            reduction:         "random".to_string(),
            goal_size:         500,
            max_depth:         10,
            index_limit:       Some(10_000),
            mask_span:         1,
            batch_collation:   false,
            max_seq_len:       512,
            aligned_goal_size: 100,
            key_only:          false,
            vocab_size:        30_000,
            train_proportion:  0.8,
            batch_size:        64,
            seed:              42,
        }
    }
}

impl BuildConfig {
    /// The data-layer part of this config
    pub fn dataset_config(&self, variant: DatasetVariant) -> DatasetConfig {
        DatasetConfig {
            variant,
            index_limit:       self.index_limit,
            mask_span:         self.mask_span,
            batch_collation:   self.batch_collation,
            max_seq_len:       self.max_seq_len,
            aligned_goal_size: Some(self.aligned_goal_size),
        }
    }
}

// ─── BuildUseCase ─────────────────────────────────────────────────────────────
pub struct BuildUseCase {
    config: BuildConfig,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Execute the full build end to end
    pub fn execute(&self) -> Result<BuildSummary> {
        let cfg = &self.config;

        // ── Step 1: Resolve names before touching any data ────────────────────
        let variant: DatasetVariant = cfg.variant.parse()?;
        let reduction = Reduction::from_name(&cfg.reduction, cfg.goal_size, cfg.max_depth)?;

        // ── Step 2: Load the forest ───────────────────────────────────────────
        tracing::info!("Loading trees from '{}'", cfg.forest_dir);
        let mut forest = ForestLoader::new(&cfg.forest_dir).load_all()?;
        if forest.is_empty() {
            tracing::warn!("No trees found in '{}', the datasets will be empty", cfg.forest_dir);
        }
        let loaded_nodes = count_nodes(&forest);

        // ── Step 3: Reduce ────────────────────────────────────────────────────
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        reduce_forest(&mut forest, reduction, &mut rng);

        // ── Step 4: Vocabulary ────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&cfg.out_dir).load_or_build(&forest, cfg.vocab_size)?;
        let vocab     = VocabTokenizer::new(tokenizer, cfg.key_only)?;
        tracing::info!("Vocabulary size: {} (key_only={})", vocab.vocab_size(), cfg.key_only);

        // ── Step 5: Index, sample and pad ─────────────────────────────────────
        let dataset = TreeDataset::build(
            &mut forest,
            &cfg.dataset_config(variant),
            Tokenizers::uniform(&vocab),
            &mut rng,
        )?;
        let shape   = dataset.shape();
        let samples = dataset.sample_count();

        // ── Step 6: Train / validation split ──────────────────────────────────
        let (train, val) = dataset.split(cfg.train_proportion, &mut rng);
        tracing::info!("Split: {} train, {} validation", train.sample_count(), val.sample_count());

        // ── Step 7: Save ──────────────────────────────────────────────────────
        let store = DatasetStore::new(&cfg.out_dir)?;
        store.save_dataset(Split::Train, &train)?;
        store.save_dataset(Split::Val, &val)?;
        store.save_config(cfg)?;

        // ── Step 8: Report ────────────────────────────────────────────────────
        let nodes   = count_nodes(&forest);
        let summary = BuildSummary {
            variant:   variant.name().to_string(),
            reduction: cfg.reduction.trim().to_ascii_lowercase(),
            trees:     forest.len(),
            nodes,
            removed:   loaded_nodes - nodes,
            samples,
            node_max:  shape.node_max,
            tree_max:  shape.tree_max,
            train:     train.sample_count(),
            val:       val.sample_count(),
        };
        BuildReport::new(&cfg.out_dir)?.log(&summary)?;

        Ok(summary)
    }
}

fn count_nodes(forest: &[Tree]) -> usize {
    forest.iter().map(Tree::len).sum()
}
