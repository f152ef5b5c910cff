// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `build` and `inspect`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::build_use_case::BuildConfig;
use crate::infra::dataset_store::Split;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build train/validation datasets from a directory of tree files
    Build(BuildArgs),

    /// Load a built dataset and report its shape and first batch
    Inspect(InspectArgs),
}

/// All arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory containing .json tree files
    #[arg(long, default_value = "data/trees")]
    pub forest_dir: String,

    /// Directory to write datasets, tokenizer and report into
    #[arg(long, default_value = "datasets")]
    pub out_dir: String,

    /// Dataset variant: base, cont or transformer
    #[arg(long, default_value = "base")]
    pub variant: String,

    /// Tree reduction: random or depth
    #[arg(long, default_value = "random")]
    pub reduction: String,

    /// Node count each tree is reduced to (random reduction)
    #[arg(long, default_value_t = 500)]
    pub goal_size: usize,

    /// Deepest level kept, root = 0 (depth reduction)
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,

    /// Maximum number of samples; 0 means every node of the forest
    #[arg(long, default_value_t = 10_000)]
    pub indexes_size: usize,

    /// Consecutive nodes masked per sample (cont variant)
    #[arg(long, default_value_t = 1)]
    pub mask_span: usize,

    /// Pad per mini-batch instead of to dataset-wide maxima
    #[arg(long)]
    pub batch_collation: bool,

    /// Fixed sequence length (transformer variant)
    #[arg(long, default_value_t = 512)]
    pub max_seq_len: usize,

    /// Node count each tree is reduced to before indexing (transformer variant)
    #[arg(long, default_value_t = 100)]
    pub aligned_goal_size: usize,

    /// Tokenize the target node by tag and attribute keys only
    #[arg(long)]
    pub key_only: bool,

    /// Upper bound on vocabulary entries, reserved tokens included
    #[arg(long, default_value_t = 30_000)]
    pub vocab_size: usize,

    /// Fraction of samples kept for training
    #[arg(long, default_value_t = 0.8)]
    pub train_proportion: f64,

    /// Mini-batch size recorded for `inspect`
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Seed for reduction, index shuffling and the split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI BuildArgs into the application-layer BuildConfig.
/// The application layer never sees clap types.
impl From<BuildArgs> for BuildConfig {
    fn from(a: BuildArgs) -> Self {
        BuildConfig {
            forest_dir:        a.forest_dir,
            out_dir:           a.out_dir,
            variant:           a.variant,
            reduction:         a.reduction,
            goal_size:         a.goal_size,
            max_depth:         a.max_depth,
            index_limit:       (a.indexes_size > 0).then_some(a.indexes_size),
            mask_span:         a.mask_span,
            batch_collation:   a.batch_collation,
            max_seq_len:       a.max_seq_len,
            aligned_goal_size: a.aligned_goal_size,
            key_only:          a.key_only,
            vocab_size:        a.vocab_size,
            train_proportion:  a.train_proportion,
            batch_size:        a.batch_size,
            seed:              a.seed,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SplitArg {
    Train,
    Val,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Self {
        match s {
            SplitArg::Train => Split::Train,
            SplitArg::Val   => Split::Val,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory a previous `build` wrote into
    #[arg(long, default_value = "datasets")]
    pub out_dir: String,

    /// Which half of the split to load
    #[arg(long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// Mini-batch size; defaults to the one in build_config.json
    #[arg(long)]
    pub batch_size: Option<usize>,
}
