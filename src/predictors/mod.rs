use itertools::Itertools;
use rayon::prelude::*;

use crate::io::{MovieId, Observation, Score, UserId};

pub mod biased_baseline;
pub mod global_average;

pub const MIN_RATING: Score = 1.0;
pub const MAX_RATING: Score = 5.0;

/// Anything that can predict a rating for a (user, movie) pair. A factorization model trained
/// elsewhere plugs in here, or hands its predictions over as a file.
pub trait RatingPredictor: Sync {
    fn predict(&self, user_id: UserId, movie_id: MovieId) -> Option<Score>;

    /// Predicts every pair, pairs the model cannot score are dropped.
    fn predict_all(&self, pairs: &[(UserId, MovieId)]) -> Vec<Observation> {
        pairs
            .par_iter()
            .filter_map(|(user_id, movie_id)| {
                self.predict(*user_id, *movie_id)
                    .map(|score| (*user_id, *movie_id, score))
            })
            .collect()
    }

    fn name(&self) -> String;
}

/// Strips the ratings off, keeping the (user, movie) pairs to predict for.
pub fn for_predict(ratings: &[Observation]) -> Vec<(UserId, MovieId)> {
    ratings
        .iter()
        .map(|(user_id, movie_id, _score)| (*user_id, *movie_id))
        .collect()
}

/// (user, movie) pairs grouped per user, users in ascending order. One group is what a single
/// recommendation request would ask for.
pub fn pairs_by_user(ratings: &[Observation]) -> Vec<Vec<(UserId, MovieId)>> {
    ratings
        .iter()
        .map(|(user_id, movie_id, _score)| (*user_id, *movie_id))
        .into_group_map_by(|(user_id, _movie_id)| *user_id)
        .into_iter()
        .sorted_by_key(|(user_id, _pairs)| *user_id)
        .map(|(_user_id, pairs)| pairs)
        .collect()
}

#[cfg(test)]
mod predictors_test {
    use super::*;

    #[test]
    fn should_group_pairs_per_user() {
        let ratings = vec![(2, 10, 4.0), (1, 11, 3.0), (2, 12, 5.0), (3, 10, 1.0)];
        let groups = pairs_by_user(&ratings);
        assert_eq!(
            vec![vec![(1, 11)], vec![(2, 10), (2, 12)], vec![(3, 10)]],
            groups
        );
        assert_eq!(for_predict(&ratings).len(), groups.iter().map(Vec::len).sum::<usize>());
    }
}
