// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits describing what a DOM forest,
// a sampling target and a training sample ARE.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - NO concrete tokenizer or vocabulary code
//   - Only plain Rust structs, enums, and traits
//
// The tree type owns its node arena and its path. Masking is
// the only mutation tokenizers ever observe, and it is only
// reachable through the scoped guard in mask.rs.

// Arena-backed DOM tree with a rebuildable post-order path
pub mod tree;

// Scoped node masking (mask -> read -> unmask)
pub mod mask;

// Sampling targets, samples and the padding sentinel
pub mod sample;

// Error conditions raised by the sampling pipeline
pub mod error;

// Collaborator contracts: tokenizers, vocabulary, sources
pub mod traits;
