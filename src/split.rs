use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::error::{RatingsError, Result};
use crate::io::Observation;

/// Randomly partitions `ratings` into `weights.len()` buckets, proportional to the (normalised)
/// weights. Identical input order, weights and seed always give identical buckets.
pub fn random_split(
    ratings: &[Observation],
    weights: &[f64],
    seed: u64,
) -> Result<Vec<Vec<Observation>>> {
    if weights.is_empty() {
        return Err(RatingsError::InvalidArgument(
            "at least one split weight is required".to_string(),
        ));
    }
    if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
        return Err(RatingsError::InvalidArgument(format!(
            "split weights must be finite and non-negative, got {:?}",
            weights
        )));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(RatingsError::InvalidArgument(
            "split weights must not sum to zero".to_string(),
        ));
    }

    let upper_bounds = weights
        .iter()
        .scan(0_f64, |cumulative, weight| {
            *cumulative += weight / total;
            Some(*cumulative)
        })
        .collect::<Vec<_>>();

    let mut rng = Pcg64::seed_from_u64(seed);
    let mut buckets: Vec<Vec<Observation>> = vec![Vec::new(); weights.len()];
    let last_bucket = weights.len() - 1;

    for rating in ratings {
        let draw: f64 = rng.gen();
        let bucket = upper_bounds
            .iter()
            .position(|upper_bound| draw < *upper_bound)
            .unwrap_or(last_bucket);
        buckets[bucket].push(*rating);
    }

    Ok(buckets)
}

#[cfg(test)]
mod split_test {
    use super::*;

    fn ratings(qty: u32) -> Vec<Observation> {
        (0..qty).map(|index| (index % 97, index, (index % 5 + 1) as f64)).collect()
    }

    #[test]
    fn should_partition_all_ratings() {
        let input = ratings(10_000);
        let buckets = random_split(&input, &[6.0, 2.0, 2.0], 0).unwrap();
        assert_eq!(3, buckets.len());
        assert_eq!(10_000, buckets.iter().map(|bucket| bucket.len()).sum::<usize>());

        let mut movie_ids = buckets
            .iter()
            .flatten()
            .map(|(_, movie_id, _)| *movie_id)
            .collect::<Vec<_>>();
        movie_ids.sort_unstable();
        assert_eq!((0..10_000_u32).collect::<Vec<_>>(), movie_ids);
    }

    #[test]
    fn should_split_roughly_by_weight() {
        let buckets = random_split(&ratings(10_000), &[6.0, 2.0, 2.0], 5).unwrap();
        assert!((5_500..6_500).contains(&buckets[0].len()));
        assert!((1_500..2_500).contains(&buckets[1].len()));
        assert!((1_500..2_500).contains(&buckets[2].len()));
    }

    #[test]
    fn should_be_deterministic_per_seed() {
        let input = ratings(1_000);
        let first = random_split(&input, &[0.5, 0.5], 42).unwrap();
        let second = random_split(&input, &[0.5, 0.5], 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_reject_invalid_weights() {
        let input = ratings(10);
        assert!(random_split(&input, &[], 0).is_err());
        assert!(random_split(&input, &[0.0, 0.0], 0).is_err());
        assert!(random_split(&input, &[1.0, -1.0], 0).is_err());
        assert!(random_split(&input, &[1.0, f64::NAN], 0).is_err());
    }

    #[test]
    fn should_leave_zero_weight_bucket_empty() {
        let buckets = random_split(&ratings(500), &[1.0, 0.0], 3).unwrap();
        assert_eq!(500, buckets[0].len());
        assert!(buckets[1].is_empty());
    }
}
