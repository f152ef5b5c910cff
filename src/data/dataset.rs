// ============================================================
// Layer 4 — Tree Dataset
// ============================================================
// One configurable pipeline builds all three dataset variants.
// A variant is nothing more than a row in this strategy table:
//
//   variant       index strategy    sample strategy   padding
//   ───────────   ───────────────   ───────────────   ─────────────────────────
//   base          Single            NodeVsTree        DatasetWide | Deferred
//   cont          Bundle(span)      MaskedTree        DatasetWide | Deferred
//   transformer   Single            Aligned           FixedLength(ignore id)
//
// The transformer variant additionally reduces every tree to a
// small goal size before indexing, since its samples are flat
// sequences over the whole tree.
//
// Samples are built eagerly in TreeDataset::build and are
// positionally aligned with `indexes`: samples[i] came from
// indexes[i].
//
// Reference: Burn Book §4 (Dataset trait)

use std::fmt;
use std::str::FromStr;

use burn::data::dataset::Dataset;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::indexer::{build_indexes, IndexStrategy};
use crate::data::padding::Padding;
use crate::data::reduction::{reduce_forest, Reduction};
use crate::data::sampler::{build_samples, SampleStrategy};
use crate::data::splitter::split_train_val;
use crate::domain::error::{DatasetError, Result};
use crate::domain::sample::{Sample, SampleIndex, SampleShape};
use crate::domain::traits::{SpecialTokens, Tokenizers};
use crate::domain::tree::Tree;

// ─── DatasetVariant ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetVariant {
    /// (node, tree) pairs
    Base,
    /// (masked tree, tree) pairs
    Cont,
    /// (labels, inputs) flat aligned sequences
    Transformer,
}

impl DatasetVariant {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetVariant::Base        => "base",
            DatasetVariant::Cont        => "cont",
            DatasetVariant::Transformer => "transformer",
        }
    }
}

impl FromStr for DatasetVariant {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base"        => Ok(DatasetVariant::Base),
            "cont"        => Ok(DatasetVariant::Cont),
            "transformer" => Ok(DatasetVariant::Transformer),
            _             => Err(DatasetError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for DatasetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── DatasetConfig ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub variant:           DatasetVariant,
    /// Maximum number of indexes; None uses every node of the forest
    pub index_limit:       Option<usize>,
    /// Consecutive positions masked per index (cont only)
    pub mask_span:         usize,
    /// Skip dataset-wide padding and pad each batch instead
    pub batch_collation:   bool,
    /// Fixed sequence length (transformer only)
    pub max_seq_len:       usize,
    /// Per-tree random reduction before indexing (transformer only)
    pub aligned_goal_size: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            variant:           DatasetVariant::Base,
            index_limit:       Some(10_000),
            mask_span:         1,
            batch_collation:   false,
            max_seq_len:       512,
            aligned_goal_size: Some(100),
        }
    }
}

/// The strategy triple one variant plugs into the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pipeline {
    index:   IndexStrategy,
    sample:  SampleStrategy,
    padding: Padding,
}

impl DatasetConfig {
    fn pipeline(&self, special: &dyn SpecialTokens) -> Pipeline {
        let pad_up = if self.batch_collation { Padding::Deferred } else { Padding::DatasetWide };

        match self.variant {
            DatasetVariant::Base => Pipeline {
                index:   IndexStrategy::Single,
                sample:  SampleStrategy::NodeVsTree,
                padding: pad_up,
            },
            DatasetVariant::Cont => Pipeline {
                index:   IndexStrategy::Bundle { span: self.mask_span.max(1) },
                sample:  SampleStrategy::MaskedTree,
                padding: pad_up,
            },
            DatasetVariant::Transformer => Pipeline {
                index:   IndexStrategy::Single,
                sample:  SampleStrategy::Aligned,
                padding: Padding::FixedLength {
                    max_seq_len: self.max_seq_len,
                    fill:        special.ignore_id(),
                },
            },
        }
    }
}

// ─── TreeDataset ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDataset {
    variant: DatasetVariant,
    padding: Padding,
    /// Padded shape, or the raw maxima when padding is deferred
    shape:   SampleShape,
    indexes: Vec<SampleIndex>,
    samples: Vec<Sample>,
}

impl TreeDataset {
    /// Run the full pipeline over `forest`.
    ///
    /// The forest must already be reduced; it is borrowed mutably
    /// because masking flips flags on its nodes while each sample is
    /// tokenized (every flag is cleared again before this returns).
    pub fn build<R: Rng + ?Sized>(
        forest:     &mut [Tree],
        config:     &DatasetConfig,
        tokenizers: Tokenizers<'_>,
        rng:        &mut R,
    ) -> Result<Self> {
        let pipeline = config.pipeline(tokenizers.special);
        tracing::info!("Building '{}' dataset with {:?}", config.variant, pipeline);

        if config.variant == DatasetVariant::Transformer {
            if let Some(goal_size) = config.aligned_goal_size {
                reduce_forest(forest, Reduction::Random { goal_size }, rng);
            }
        }

        let indexes = build_indexes(forest, config.index_limit, pipeline.index, rng);
        let (mut samples, raw_shape) = build_samples(forest, &indexes, pipeline.sample, &tokenizers)?;

        pipeline.padding.apply(&mut samples, raw_shape)?;

        let shape = match pipeline.padding {
            Padding::Deferred => raw_shape,
            _                 => SampleShape::of(samples.iter()),
        };

        Ok(Self {
            variant: config.variant,
            padding: pipeline.padding,
            shape,
            indexes,
            samples,
        })
    }

    pub fn variant(&self) -> DatasetVariant {
        self.variant
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn shape(&self) -> SampleShape {
        self.shape
    }

    pub fn indexes(&self) -> &[SampleIndex] {
        &self.indexes
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Shuffle (index, sample) pairs together and split them into
    /// (train, validation) datasets sharing this dataset's shape.
    pub fn split<R: Rng + ?Sized>(self, train_fraction: f64, rng: &mut R) -> (Self, Self) {
        let Self { variant, padding, shape, indexes, samples } = self;

        let pairs: Vec<(SampleIndex, Sample)> = indexes.into_iter().zip(samples).collect();
        let (train, val) = split_train_val(pairs, train_fraction, rng);

        let rebuild = |pairs: Vec<(SampleIndex, Sample)>| {
            let (indexes, samples): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            Self { variant, padding, shape, indexes, samples }
        };

        (rebuild(train), rebuild(val))
    }
}

impl Dataset<Sample> for TreeDataset {
    fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
