// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles the concerns that touch the disk or a third-party
// vocabulary, keeping data/ free of both:
//
//   tokenizer_store.rs — Builds a word-level tokenizer.json from
//                        the forest, or loads an existing one.
//
//   vocab_tokenizer.rs — The default tokenizer: implements every
//                        tokenizer trait from domain/traits.rs
//                        on top of that vocabulary.
//
//   dataset_store.rs   — Saves and loads train/val datasets and
//                        the build config as JSON.
//
//   report.rs          — Appends one CSV row per build.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Vocabulary building, saving, and loading
pub mod tokenizer_store;

/// Word-level tokenizer implementing the domain traits
pub mod vocab_tokenizer;

/// Dataset and build config persistence
pub mod dataset_store;

/// Build report CSV logger
pub mod report;
