// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The sampling pipeline never knows HOW a node becomes tokens.
// It only talks to these traits, so the vocabulary tokenizer
// in infra/ can be swapped for any other implementation
// (a key-only tokenizer, a test fake, a BPE tokenizer...)
// without touching data/.
//
// Contract shared by every tokenizer trait:
//   - pure reads: the output depends only on the tree's
//     structure, content and CURRENT mask flags
//   - no caching across calls, because the same tree is
//     tokenized once masked and once unmasked
//   - infallible: unknown words map to an out-of-vocabulary id
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sample::{NodeTokens, TreeTokens, PAD_VALUE};
use crate::domain::tree::{Node, Tree};

// ─── Tokenizers ───────────────────────────────────────────────────────────────
/// Turns a single node into a flat token sequence.
pub trait NodeTokenizer {
    fn tokenize_node(&self, node: &Node) -> NodeTokens;
}

/// Turns a whole tree into one token row per path position,
/// in path order. Hidden nodes must render differently from
/// visible ones.
pub trait TreeTokenizer {
    fn tokenize_tree(&self, tree: &Tree) -> TreeTokens;
}

/// Turns a tree into a (labels, inputs) pair of flat sequences
/// with exactly the same length, for token-prediction training.
pub trait AlignedTreeTokenizer {
    fn tokenize_aligned(&self, tree: &Tree) -> (NodeTokens, NodeTokens);
}

// ─── SpecialTokens ────────────────────────────────────────────────────────────
/// Reserved ids of the vocabulary behind a tokenizer.
pub trait SpecialTokens {
    /// Structural filler, always 0
    fn pad_id(&self) -> u32 {
        PAD_VALUE
    }

    /// "Leave this position out of the loss"
    fn ignore_id(&self) -> u32;

    /// Replacement for words the vocabulary does not know
    fn oov_id(&self) -> u32;

    /// Replacement for hidden content
    fn mask_id(&self) -> u32;
}

/// The set of collaborators one dataset build talks to.
/// Borrowed trait objects so the node side and the tree side
/// can come from different implementations.
#[derive(Clone, Copy)]
pub struct Tokenizers<'a> {
    pub node:    &'a dyn NodeTokenizer,
    pub tree:    &'a dyn TreeTokenizer,
    pub aligned: &'a dyn AlignedTreeTokenizer,
    pub special: &'a dyn SpecialTokens,
}

impl<'a> Tokenizers<'a> {
    /// Use one implementation for every role
    pub fn uniform<T>(tokenizer: &'a T) -> Self
    where
        T: NodeTokenizer + TreeTokenizer + AlignedTreeTokenizer + SpecialTokens,
    {
        Self {
            node:    tokenizer,
            tree:    tokenizer,
            aligned: tokenizer,
            special: tokenizer,
        }
    }
}

// ─── ForestSource ─────────────────────────────────────────────────────────────
/// Any component that can load a forest of trees.
///
/// Implementations:
///   - ForestLoader → a directory of JSON tree files
pub trait ForestSource {
    /// Load every tree, with paths already built.
    fn load_all(&self) -> Result<Vec<Tree>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - TreeDataset → samples, indexes and shape as JSON
pub trait Persistable: Sized {
    fn save(&self, path: &str) -> Result<()>;

    fn load(path: &str) -> Result<Self>;
}

// ─── Test Fakes ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub mod fakes {
    use super::*;

    pub const MASK: u32   = 2;
    pub const IGNORE: u32 = 3;

    /// Encodes a node as the bytes of its tag plus one token per
    /// attribute, so "div" with one attribute becomes [100, 105, 118, 4].
    /// Hidden nodes in a tree become a single MASK token.
    pub struct ByteTokenizer;

    impl NodeTokenizer for ByteTokenizer {
        fn tokenize_node(&self, node: &Node) -> NodeTokens {
            let mut out: Vec<u32> = node.tag.bytes().map(u32::from).collect();
            out.extend(node.attributes.iter().map(|_| 4));
            out
        }
    }

    impl TreeTokenizer for ByteTokenizer {
        fn tokenize_tree(&self, tree: &Tree) -> TreeTokens {
            tree.path()
                .iter()
                .map(|&id| {
                    let node = tree.node(id);
                    if node.is_hidden() { vec![MASK] } else { self.tokenize_node(node) }
                })
                .collect()
        }
    }

    impl AlignedTreeTokenizer for ByteTokenizer {
        fn tokenize_aligned(&self, tree: &Tree) -> (NodeTokens, NodeTokens) {
            let mut labels = Vec::new();
            let mut inputs = Vec::new();
            for &id in tree.path() {
                let node   = tree.node(id);
                let tokens = self.tokenize_node(node);
                if node.is_affected() {
                    inputs.extend(std::iter::repeat(MASK).take(tokens.len()));
                    labels.extend(tokens);
                } else {
                    labels.extend(std::iter::repeat(IGNORE).take(tokens.len()));
                    inputs.extend(tokens);
                }
            }
            (labels, inputs)
        }
    }

    impl SpecialTokens for ByteTokenizer {
        fn ignore_id(&self) -> u32 { IGNORE }
        fn oov_id(&self) -> u32 { 1 }
        fn mask_id(&self) -> u32 { MASK }
    }

    /// Breaks the aligned contract by dropping the last label.
    pub struct LopsidedTokenizer;

    impl AlignedTreeTokenizer for LopsidedTokenizer {
        fn tokenize_aligned(&self, tree: &Tree) -> (NodeTokens, NodeTokens) {
            let (mut labels, inputs) = ByteTokenizer.tokenize_aligned(tree);
            labels.pop();
            (labels, inputs)
        }
    }
}
