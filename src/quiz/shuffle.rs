use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly shuffled copy of `items`, leaving the source untouched.
///
/// `SliceRandom::shuffle` is a Fisher-Yates shuffle.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shuffled_is_a_permutation() {
        let source = vec!["a", "b", "c", "d"];
        let mut rng = StdRng::seed_from_u64(7);

        let mut result = shuffled(&source, &mut rng);
        assert_eq!(source, ["a", "b", "c", "d"]);

        result.sort();
        assert_eq!(result, source);
    }

    #[test]
    fn test_every_position_is_reachable() {
        let source = [0, 1, 2, 3];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen_first = [false; 4];

        for _ in 0..200 {
            seen_first[shuffled(&source, &mut rng)[0]] = true;
        }

        assert!(seen_first.iter().all(|seen| *seen));
    }
}
