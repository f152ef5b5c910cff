//! Failure conditions of the sampling pipeline.
//!
//! None of these are transient: every build is deterministic for
//! a fixed seed, so each variant points at a defect upstream
//! (a wrong maximum, a tokenizer contract breach, a bad config
//! value) and aborts the pass that raised it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A sequence was still longer than its target after padding.
    #[error("Padding overflow: sequence has {actual} entries, target length is {expected}")]
    PaddingOverflow {
        expected: usize,
        actual:   usize,
    },

    /// The aligned tokenizer returned node and tree sequences of different lengths.
    #[error(
        "Alignment violation in tree {tree_id}: node sequence has {node_len} tokens, \
         tree sequence has {tree_len}"
    )]
    AlignmentViolation {
        tree_id:  usize,
        node_len: usize,
        tree_len: usize,
    },

    /// An index points outside its tree's current path.
    #[error("Stale index: position {position} in tree {tree_id}, which has {path_len} nodes")]
    StaleIndex {
        tree_id:  usize,
        position: usize,
        path_len: usize,
    },

    #[error("Unknown reduction strategy '{0}' (expected 'random' or 'depth')")]
    UnknownReduction(String),

    #[error("Unknown dataset variant '{0}' (expected 'base', 'cont' or 'transformer')")]
    UnknownVariant(String),
}
