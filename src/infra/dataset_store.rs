// ============================================================
// Layer 6 — Dataset Store
// ============================================================
// Saves and restores built datasets as JSON.
//
// What gets saved per build:
//   1. train.json          — the training TreeDataset
//   2. val.json            — the validation TreeDataset
//   3. build_config.json   — the BuildConfig that produced them
//
// Each dataset file holds the variant, padding policy, shape,
// indexes and samples, so `inspect` can batch it without the
// forest or the tokenizer.
//
// File layout:
//   out/
//     train.json
//     val.json
//     build_config.json
//     tokenizer.json       ← written by TokenizerStore
//     builds.csv           ← written by BuildReport
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::build_use_case::BuildConfig;
use crate::data::dataset::TreeDataset;
use crate::domain::traits::Persistable;

impl Persistable for TreeDataset {
    fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write dataset to '{}'", path))?;
        tracing::debug!("Saved {} samples to '{}'", self.sample_count(), path);
        Ok(())
    }

    fn load(path: &str) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read dataset from '{}'. Have you run 'build' first?", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a saved dataset", path))
    }
}

/// Which half of a split to read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    fn file_name(&self) -> &'static str {
        match self {
            Split::Train => "train.json",
            Split::Val   => "val.json",
        }
    }
}

/// Manages the dataset files of one output directory.
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_of(&self, name: &str) -> String {
        self.dir.join(name).to_string_lossy().into_owned()
    }

    pub fn save_dataset(&self, split: Split, dataset: &TreeDataset) -> Result<()> {
        dataset.save(&self.path_of(split.file_name()))
    }

    pub fn load_dataset(&self, split: Split) -> Result<TreeDataset> {
        TreeDataset::load(&self.path_of(split.file_name()))
    }

    pub fn save_config(&self, cfg: &BuildConfig) -> Result<()> {
        let path = self.dir.join("build_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved build config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<BuildConfig> {
        let path = self.dir.join("build_config.json");
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{DatasetConfig, DatasetVariant};
    use crate::domain::traits::fakes::ByteTokenizer;
    use crate::domain::traits::Tokenizers;
    use crate::domain::tree::fixtures::page;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn dataset(variant: DatasetVariant) -> TreeDataset {
        let mut forest = vec![page()];
        let mut rng    = StdRng::seed_from_u64(1);
        let cfg        = DatasetConfig { variant, ..DatasetConfig::default() };
        TreeDataset::build(&mut forest, &cfg, Tokenizers::uniform(&ByteTokenizer), &mut rng).unwrap()
    }

    #[test]
    fn test_dataset_survives_save_and_load() {
        let dir   = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().to_str().unwrap()).unwrap();
        let built = dataset(DatasetVariant::Cont);

        store.save_dataset(Split::Val, &built).unwrap();
        let loaded = store.load_dataset(Split::Val).unwrap();

        assert_eq!(loaded.variant(), DatasetVariant::Cont);
        assert_eq!(loaded.shape(), built.shape());
        assert_eq!(loaded.padding(), built.padding());
        assert_eq!(loaded.indexes(), built.indexes());
        assert_eq!(loaded.samples(), built.samples());
    }

    #[test]
    fn test_config_survives_save_and_load() {
        let dir   = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().to_str().unwrap()).unwrap();
        let cfg   = BuildConfig { seed: 7, ..BuildConfig::default() };

        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_missing_dataset_is_an_error() {
        let dir   = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().to_str().unwrap()).unwrap();
        let err   = store.load_dataset(Split::Train).unwrap_err();
        assert!(err.to_string().contains("Have you run 'build' first?"));
    }
}
