// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (building datasets or inspecting them).
//
// Rules for this layer:
//   - No sampling or padding logic here (that's Layer 4)
//   - No UI or printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Forest → reduced forest → padded train/val datasets
pub mod build_use_case;

// Saved dataset → DataLoader → first batch shape
pub mod inspect_use_case;
