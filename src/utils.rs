use rand::{seq::SliceRandom, Rng};

use crate::error::{GameError, GameResult};

/// Pick a single element uniformly at random
pub fn pick_one<'a, T>(items: &'a [T], rng: &mut impl Rng) -> GameResult<&'a T> {
    items.choose(rng).ok_or(GameError::EmptyInput)
}

/// Pick `count` distinct elements uniformly without replacement.
/// The whole sequence is shuffled and the first `count` elements are kept,
/// so asking for every element returns a random permutation.
pub fn pick_distinct_subset<T: Clone>(
    items: &[T],
    count: usize,
    rng: &mut impl Rng,
) -> GameResult<Vec<T>> {
    if count > items.len() {
        return Err(GameError::SubsetTooLarge {
            requested: count,
            available: items.len(),
        });
    }
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    Ok(shuffled)
}

/// Returns true with the given probability. Values outside [0, 1] are clamped.
pub fn bernoulli_trial(probability: f64, rng: &mut impl Rng) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        return false;
    }
    if probability >= 1.0 {
        return true;
    }
    rng.gen_bool(probability)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_pick_one_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let empty: Vec<i32> = vec![];
        assert_eq!(pick_one(&empty, &mut rng), Err(GameError::EmptyInput));
    }

    #[test]
    fn test_pick_one_covers_every_element() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = [1, 2, 3];
        let seen: HashSet<i32> = (0..200)
            .map(|_| *pick_one(&items, &mut rng).unwrap())
            .collect();
        assert_eq!(seen, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_pick_distinct_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<usize> = (1..=10).collect();
        let picked = pick_distinct_subset(&items, 4, &mut rng).unwrap();
        assert_eq!(picked.len(), 4);
        let unique: HashSet<usize> = picked.iter().copied().collect();
        assert_eq!(unique.len(), 4);
        assert!(picked.iter().all(|i| items.contains(i)));

        // Full permutation keeps every element
        let mut all = pick_distinct_subset(&items, 10, &mut rng).unwrap();
        all.sort();
        assert_eq!(all, items);
    }

    #[test]
    fn test_pick_distinct_subset_too_large() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            pick_distinct_subset(&[1, 2], 3, &mut rng),
            Err(GameError::SubsetTooLarge {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_bernoulli_trial_edges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!bernoulli_trial(0.0, &mut rng));
            assert!(bernoulli_trial(1.0, &mut rng));
            assert!(!bernoulli_trial(-3.0, &mut rng));
            assert!(bernoulli_trial(4.0, &mut rng));
            assert!(!bernoulli_trial(f64::NAN, &mut rng));
        }
    }

    #[test]
    fn test_bernoulli_trial_rate() {
        let mut rng = StdRng::seed_from_u64(99);
        let hits = (0..10_000)
            .filter(|_| bernoulli_trial(0.1, &mut rng))
            .count();
        // Loose bounds around the expected 1000
        assert!(hits > 800 && hits < 1200, "hits: {}", hits);
    }
}
