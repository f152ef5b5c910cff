// ============================================================
// Layer 4 — Index Builder
// ============================================================
// Enumerates sampling targets across the forest:
//
//   for tree_id in forest order:
//       for position in 0..tree.len():
//           strategy.record(position, tree_id)
//           stop everything once `limit` indexes exist
//   shuffle
//
// The enumeration is deterministic; the shuffle (seeded by the
// caller's rng) removes every trace of forest order, so nothing
// downstream may assume tree-local ordering.
//
// Result length = min(limit, total nodes in the forest).
// With a limit, trees late in the forest may never be visited:
// the budget is spent front to back before shuffling.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::sample::SampleIndex;
use crate::domain::tree::Tree;

/// How one enumerated position is recorded as an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    /// One index per node position
    Single,

    /// One index per node position, covering up to `span`
    /// consecutive positions starting there (clipped at the
    /// end of the path)
    Bundle { span: usize },
}

impl IndexStrategy {
    pub fn record(&self, indexes: &mut Vec<SampleIndex>, position: usize, tree_id: usize, path_len: usize) {
        match *self {
            IndexStrategy::Single => {
                indexes.push(SampleIndex::single(position, tree_id));
            }
            IndexStrategy::Bundle { span } => {
                let span = span.min(path_len - position);
                indexes.push(SampleIndex::bundle(position, span, tree_id));
            }
        }
    }
}

/// Build the shuffled index list. `limit = None` uses every node.
pub fn build_indexes<R: Rng + ?Sized>(
    forest:   &[Tree],
    limit:    Option<usize>,
    strategy: IndexStrategy,
    rng:      &mut R,
) -> Vec<SampleIndex> {
    let mut indexes = Vec::new();

    if limit != Some(0) {
        'forest: for (tree_id, tree) in forest.iter().enumerate() {
            for position in 0..tree.len() {
                strategy.record(&mut indexes, position, tree_id, tree.len());
                if Some(indexes.len()) == limit {
                    break 'forest;
                }
            }
        }
    }

    indexes.shuffle(rng);

    tracing::info!("Built {} sample indexes (limit: {:?})", indexes.len(), limit);
    indexes
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::fixtures::{flat, page};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_every_position_exactly_once() {
        // Tree A has 5 nodes, tree B has 3
        let forest  = vec![flat(5), flat(3)];
        let mut rng = StdRng::seed_from_u64(42);

        let indexes = build_indexes(&forest, Some(1000), IndexStrategy::Single, &mut rng);

        assert_eq!(indexes.len(), 8);
        let unique: HashSet<(usize, usize)> = indexes.iter()
            .map(|i| (i.position, i.tree_id))
            .collect();
        let expected: HashSet<(usize, usize)> = (0..5).map(|p| (p, 0))
            .chain((0..3).map(|p| (p, 1)))
            .collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn test_limit_stops_enumeration_early() {
        let forest  = vec![page(), flat(4)];
        let mut rng = StdRng::seed_from_u64(0);

        let indexes = build_indexes(&forest, Some(4), IndexStrategy::Single, &mut rng);

        assert_eq!(indexes.len(), 4);
        // The budget runs out inside the first tree
        assert!(indexes.iter().all(|i| i.tree_id == 0 && i.position < 4));
        let unique: HashSet<_> = indexes.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_no_limit_uses_everything() {
        let forest  = vec![page(), flat(4), flat(1)];
        let mut rng = StdRng::seed_from_u64(9);
        let indexes = build_indexes(&forest, None, IndexStrategy::Single, &mut rng);
        assert_eq!(indexes.len(), 11);
        assert!(indexes.iter().all(|i| i.position < forest[i.tree_id].len()));
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!(build_indexes(&[page()], Some(0), IndexStrategy::Single, &mut rng).is_empty());
    }

    #[test]
    fn test_bundle_spans_are_clipped_to_path() {
        let forest  = vec![flat(4)];
        let mut rng = StdRng::seed_from_u64(1);
        let indexes = build_indexes(&forest, None, IndexStrategy::Bundle { span: 3 }, &mut rng);

        assert_eq!(indexes.len(), 4);
        for idx in &indexes {
            assert!(idx.positions().end <= 4);
            assert_eq!(idx.span, 3.min(4 - idx.position));
        }
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let forest = vec![flat(20), page()];
        let build  = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            build_indexes(&forest, None, IndexStrategy::Single, &mut rng)
        };
        assert_eq!(build(3), build(3));
    }
}
