use rand::Rng;

/// Uniformly shuffled copy of `items` (Fisher-Yates); `items` is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Draws a session's questions: a random permutation of `all`, cut to `count`.
///
/// The result holds `min(count, all.len())` items, each drawn once.
pub fn select_session<T: Clone, R: Rng + ?Sized>(all: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut selected = shuffled(all, rng);
    selected.truncate(count);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn selection_is_a_duplicate_free_subset() {
        let all: Vec<u32> = (0..25).collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_session(&all, 10, &mut rng);

            assert_eq!(picked.len(), 10);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(picked.iter().all(|p| all.contains(p)));
        }
    }

    #[test]
    fn selection_shrinks_to_pool_size() {
        let all = vec!["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_session(&all, 10, &mut rng);

        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, all);
    }

    #[test]
    fn input_is_not_mutated() {
        let all: Vec<u32> = (0..10).collect();
        let before = all.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let _ = shuffled(&all, &mut rng);
        assert_eq!(all, before);
    }

    #[test]
    fn empty_and_single_inputs() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(select_session::<u8, _>(&[], 10, &mut rng).is_empty());
        assert_eq!(select_session(&[42], 10, &mut rng), vec![42]);
    }

    #[test]
    fn permutations_are_roughly_uniform() {
        let all = [0_u8, 1, 2];
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
        let rounds = 6_000;
        for _ in 0..rounds {
            *counts.entry(shuffled(&all, &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            // expected 1000 each
            assert!((800..=1200).contains(count), "skewed count {count}");
        }
    }
}
