// ============================================================
// Layer 6 — Vocabulary Tokenizer
// ============================================================
// The default implementation of every tokenizer trait, backed
// by a word-level HuggingFace vocabulary (see tokenizer_store).
//
// A node renders as a list of words:
//
//   <div class="nav main">Hello, world</div>
//     → ["div", "@class", "nav", "main", "hello", "world"]
//
//   tag, then every attribute as "@key" followed by the words of
//   its value, then the words of the node's text. Words are
//   lowercased with edge punctuation stripped.
//
// In key-only mode the NODE side drops attribute values and
// text, keeping ["div", "@class"]. Tree rows always use the full
// rendering.
//
// Words are looked up one by one with token_to_id, bypassing the
// tokenizer's pre-tokenizer: "@class" must stay a single word.

use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

use crate::domain::sample::{NodeTokens, TreeTokens};
use crate::domain::traits::{AlignedTreeTokenizer, NodeTokenizer, SpecialTokens, TreeTokenizer};
use crate::domain::tree::{Node, Tree};
use crate::infra::tokenizer_store::{IGNORE_TOKEN, MASK_TOKEN, UNK_TOKEN};

/// Render `node` as vocabulary words.
pub fn node_words(node: &Node, key_only: bool) -> Vec<String> {
    let mut words = Vec::new();
    push_words(&mut words, &node.tag);

    for (key, value) in &node.attributes {
        let key = normalise(key);
        if !key.is_empty() {
            words.push(format!("@{key}"));
        }
        if !key_only {
            push_words(&mut words, value);
        }
    }

    if !key_only {
        if let Some(text) = &node.text {
            push_words(&mut words, text);
        }
    }
    words
}

fn push_words(words: &mut Vec<String>, text: &str) {
    words.extend(
        text.split_whitespace()
            .map(normalise)
            .filter(|w| !w.is_empty()),
    );
}

fn normalise(word: &str) -> String {
    word.to_lowercase()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

pub struct VocabTokenizer {
    tokenizer: Tokenizer,
    key_only:  bool,
    unk_id:    u32,
    mask_id:   u32,
    ignore_id: u32,
}

impl VocabTokenizer {
    /// Wrap a vocabulary. Fails if a reserved token is missing.
    pub fn new(tokenizer: Tokenizer, key_only: bool) -> Result<Self> {
        let reserved = |token: &str| {
            tokenizer
                .token_to_id(token)
                .ok_or_else(|| anyhow!("Tokenizer vocabulary has no '{}' token", token))
        };

        let unk_id    = reserved(UNK_TOKEN)?;
        let mask_id   = reserved(MASK_TOKEN)?;
        let ignore_id = reserved(IGNORE_TOKEN)?;

        Ok(Self { tokenizer, key_only, unk_id, mask_id, ignore_id })
    }

    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn encode(&self, words: Vec<String>) -> Vec<u32> {
        words
            .iter()
            .map(|w| self.tokenizer.token_to_id(w).unwrap_or(self.unk_id))
            .collect()
    }
}

impl NodeTokenizer for VocabTokenizer {
    fn tokenize_node(&self, node: &Node) -> NodeTokens {
        self.encode(node_words(node, self.key_only))
    }
}

impl TreeTokenizer for VocabTokenizer {
    fn tokenize_tree(&self, tree: &Tree) -> TreeTokens {
        tree.path()
            .iter()
            .map(|&id| {
                let node = tree.node(id);
                if node.is_hidden() {
                    vec![self.mask_id]
                } else {
                    self.encode(node_words(node, false))
                }
            })
            .collect()
    }
}

impl AlignedTreeTokenizer for VocabTokenizer {
    fn tokenize_aligned(&self, tree: &Tree) -> (NodeTokens, NodeTokens) {
        let mut labels = Vec::new();
        let mut inputs = Vec::new();

        for &id in tree.path() {
            let node   = tree.node(id);
            let tokens = self.encode(node_words(node, false));
            let n      = tokens.len();

            if node.is_affected() {
                labels.extend(tokens);
                inputs.extend(std::iter::repeat(self.mask_id).take(n));
            } else {
                labels.extend(std::iter::repeat(self.ignore_id).take(n));
                inputs.extend(tokens);
            }
        }

        (labels, inputs)
    }
}

impl SpecialTokens for VocabTokenizer {
    fn ignore_id(&self) -> u32 {
        self.ignore_id
    }

    fn oov_id(&self) -> u32 {
        self.unk_id
    }

    fn mask_id(&self) -> u32 {
        self.mask_id
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mask::MaskKind;
    use crate::domain::tree::fixtures::page;
    use crate::infra::tokenizer_store::TokenizerStore;
    use tempfile::TempDir;

    fn vocab(key_only: bool) -> (TempDir, VocabTokenizer) {
        let dir = TempDir::new().unwrap();
        let tok = TokenizerStore::new(dir.path().to_str().unwrap())
            .load_or_build(&[page()], 1000)
            .unwrap();
        (dir, VocabTokenizer::new(tok, key_only).unwrap())
    }

    #[test]
    fn test_node_words_rendering() {
        let node = Node::new("DIV")
            .with_attribute("class", "nav main")
            .with_text("Hello, world!");

        assert_eq!(node_words(&node, false), vec!["div", "@class", "nav", "main", "hello", "world"]);
        assert_eq!(node_words(&node, true),  vec!["div", "@class"]);
    }

    #[test]
    fn test_unknown_words_map_to_oov() {
        let (_dir, tok) = vocab(false);
        let ids = tok.tokenize_node(&Node::new("html").with_text("never seen"));

        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], tok.oov_id());
        assert_eq!(&ids[1..], &[tok.oov_id(), tok.oov_id()]);
    }

    #[test]
    fn test_key_only_affects_node_side_only() {
        let (_dir, full)     = vocab(false);
        let (_dir2, keyonly) = vocab(true);
        let tree = page();
        // position 0 is <title>Home page</title>
        let title = tree.node_at(0).unwrap();

        assert_eq!(full.tokenize_node(title).len(), 3);
        assert_eq!(keyonly.tokenize_node(title).len(), 1);
        assert_eq!(full.tokenize_tree(&tree), keyonly.tokenize_tree(&tree));
    }

    #[test]
    fn test_masked_node_renders_as_one_mask_token() {
        let (_dir, tok) = vocab(false);
        let mut tree    = page();
        let target      = tree.id_at(2).unwrap();

        let rows = {
            let masked = tree.mask(&[target], MaskKind::SelfOnly);
            tok.tokenize_tree(&masked)
        };
        assert_eq!(rows[2], vec![tok.mask_id()]);
        assert_eq!(rows.iter().filter(|r| **r == vec![tok.mask_id()]).count(), 1);
        assert_eq!(tok.tokenize_tree(&tree)[2].len(), 3);
    }

    #[test]
    fn test_aligned_outputs_have_equal_length() {
        let (_dir, tok) = vocab(false);
        let mut tree    = page();
        let target      = tree.id_at(0).unwrap();

        let (labels, inputs) = {
            let guard = tree.mask(&[target], MaskKind::Affected);
            tok.tokenize_aligned(&guard)
        };
        assert_eq!(labels.len(), inputs.len());

        let masked = inputs.iter().filter(|&&t| t == tok.mask_id()).count();
        let real   = labels.iter().filter(|&&t| t != tok.ignore_id()).count();
        // title(3) + head(1) + html(3)
        assert_eq!(masked, 7);
        assert_eq!(real, 7);
    }

    #[test]
    fn test_missing_reserved_token_is_an_error() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(&path, serde_json::json!({
            "version": "1.0", "truncation": null, "padding": null, "added_tokens": [],
            "normalizer": null, "pre_tokenizer": null, "post_processor": null, "decoder": null,
            "model": { "type": "WordLevel", "vocab": { "[UNK]": 0 }, "unk_token": "[UNK]" }
        }).to_string()).unwrap();

        let tok = Tokenizer::from_file(&path).unwrap();
        assert!(VocabTokenizer::new(tok, false).is_err());
    }
}
