// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves and loads the word-level vocabulary behind
// VocabTokenizer.
//
// The vocabulary is counted over every word the forest can
// render (see vocab_tokenizer::node_words) and written straight
// to a HuggingFace tokenizer.json with a WordLevel model. The
// reserved ids are fixed:
//
//   [PAD]    = 0   structural filler
//   [UNK]    = 1   out-of-vocabulary words
//   [MASK]   = 2   hidden node content
//   [IGNORE] = 3   positions left out of the loss
//
// Words follow from id 4 in descending frequency (ties broken
// alphabetically, so the same forest always gives the same ids).
//
// If tokenizer.json already exists it is loaded instead, so a
// vocabulary can be shared between several builds.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::tree::Tree;
use crate::infra::vocab_tokenizer::node_words;

pub const PAD_TOKEN: &str    = "[PAD]";
pub const UNK_TOKEN: &str    = "[UNK]";
pub const MASK_TOKEN: &str   = "[MASK]";
pub const IGNORE_TOKEN: &str = "[IGNORE]";

const SPECIAL_TOKENS: [&str; 4] = [PAD_TOKEN, UNK_TOKEN, MASK_TOKEN, IGNORE_TOKEN];

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    /// Load existing tokenizer or build a new one from the forest
    pub fn load_or_build(&self, forest: &[Tree], vocab_size: usize) -> Result<Tokenizer> {
        if self.path().exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(forest, vocab_size)
        }
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    fn build_and_save(&self, forest: &[Tree], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Count every renderable word ───────────────────────────────
        let mut freq: HashMap<String, usize> = HashMap::new();
        for tree in forest {
            for &id in tree.path() {
                for word in node_words(tree.node(id), false) {
                    *freq.entry(word).or_insert(0) += 1;
                }
            }
        }

        // ── Step 2: Assign ids after the reserved ones ────────────────────────
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

        let mut vocab = serde_json::Map::new();
        for (id, token) in SPECIAL_TOKENS.iter().enumerate() {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                let id = vocab.len();
                vocab.insert(word.clone(), serde_json::json!(id));
            }
        }

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .enumerate()
            .map(|(id, token)| serde_json::json!({
                "id": id, "content": token, "single_word": false, "lstrip": false,
                "rstrip": false, "normalized": false, "special": true
            }))
            .collect();

        let vocab_len = vocab.len();
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": null,
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            vocab_len,
            tok_path.display()
        );

        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow::anyhow!("Cannot reload tokenizer: {e}"))
    }
}
