// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles items and splits them into two sets:
//   - Training set:   what the model learns from
//   - Validation set: held out to measure generalisation
//
// Items are shuffled again here even when they come from an
// already-shuffled index list, so both halves draw from the
// whole set.
//
// The rng is passed in so a whole build is reproducible from
// one seed.
//
// Reference: rand crate documentation (SliceRandom)

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` and split into (train, validation).
///
/// # Arguments
/// * `items`          - All available items (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `rng`            - Source of randomness for the shuffle
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut items:      Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    items.shuffle(rng);

    let total    = items.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    let val = items.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        items.len(),
        val.len(),
        (items.len() * 100) / total.max(1),
        (val.len()   * 100) / total.max(1),
    );

    (items, val)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_correct_split_sizes() {
        let mut rng           = StdRng::seed_from_u64(42);
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.8, &mut rng);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_all_items_preserved() {
        let mut rng           = StdRng::seed_from_u64(1);
        let items: Vec<usize> = (0..50).collect();
        let (train, val)      = split_train_val(items, 0.7, &mut rng);
        let mut all: Vec<usize> = train.into_iter().chain(val).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let mut rng           = StdRng::seed_from_u64(0);
        let items: Vec<usize> = Vec::new();
        let (train, val)      = split_train_val(items, 0.8, &mut rng);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let mut rng           = StdRng::seed_from_u64(0);
        let items: Vec<usize> = (0..10).collect();
        let (train, val)      = split_train_val(items, 1.0, &mut rng);
        assert_eq!(train.len(), 10);
        assert!(val.is_empty());
    }
}
