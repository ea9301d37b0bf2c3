use hashbrown::HashMap;
use itertools::Itertools;
use tracing::debug;

use crate::dataframeutils;
use crate::error::Result;
use crate::io::{MovieId, Observation, Score, UserId};
use crate::predictors::{RatingPredictor, MAX_RATING, MIN_RATING};

/// Global mean plus damped movie and user biases:
///
/// * `b_movie = Σ(r - μ) / (movie_damping + n_movie)`
/// * `b_user  = Σ(r - μ - b_movie) / (user_damping + n_user)`
///
/// Larger damping pulls the biases of rarely rated movies and users towards zero.
pub struct BiasedBaseline {
    global_mean: Score,
    movie_biases: HashMap<MovieId, f64>,
    user_biases: HashMap<UserId, f64>,
    movie_damping: usize,
    user_damping: usize,
}

impl BiasedBaseline {
    pub fn fit(
        training: &[Observation],
        movie_damping: usize,
        user_damping: usize,
    ) -> Result<BiasedBaseline> {
        let global_mean = dataframeutils::global_average(training)?;

        let movie_biases: HashMap<MovieId, f64> = training
            .iter()
            .map(|(_user_id, movie_id, score)| (*movie_id, score - global_mean))
            .into_group_map()
            .into_iter()
            .map(|(movie_id, deviations)| {
                let bias = deviations.iter().sum::<f64>()
                    / (movie_damping + deviations.len()) as f64;
                (movie_id, bias)
            })
            .collect();

        let user_biases: HashMap<UserId, f64> = training
            .iter()
            .map(|(user_id, movie_id, score)| {
                let movie_bias = movie_biases.get(movie_id).copied().unwrap_or_default();
                (*user_id, score - global_mean - movie_bias)
            })
            .into_group_map()
            .into_iter()
            .map(|(user_id, residuals)| {
                let bias = residuals.iter().sum::<f64>()
                    / (user_damping + residuals.len()) as f64;
                (user_id, bias)
            })
            .collect();

        debug!(
            "Fitted baseline on {} ratings: mean={:.4}, {} movie biases, {} user biases",
            training.len(),
            global_mean,
            movie_biases.len(),
            user_biases.len()
        );

        Ok(BiasedBaseline {
            global_mean,
            movie_biases,
            user_biases,
            movie_damping,
            user_damping,
        })
    }
}

impl RatingPredictor for BiasedBaseline {
    fn predict(&self, user_id: UserId, movie_id: MovieId) -> Option<Score> {
        let movie_bias = self.movie_biases.get(&movie_id).copied().unwrap_or_default();
        let user_bias = self.user_biases.get(&user_id).copied().unwrap_or_default();
        Some((self.global_mean + movie_bias + user_bias).clamp(MIN_RATING, MAX_RATING))
    }

    fn name(&self) -> String {
        format!(
            "BiasedBaseline(movie_damping={},user_damping={})",
            self.movie_damping, self.user_damping
        )
    }
}

#[cfg(test)]
mod biased_baseline_test {
    use super::*;
    use float_cmp::approx_eq;

    fn training() -> Vec<Observation> {
        vec![
            (1, 1, 5.0),
            (2, 1, 5.0),
            (1, 2, 1.0),
            (2, 2, 1.0),
            (3, 2, 3.0),
            (3, 3, 3.0),
        ]
    }

    #[test]
    fn should_predict_mean_without_variance() {
        let flat = vec![(1, 1, 3.0), (2, 2, 3.0), (3, 1, 3.0)];
        let predictor = BiasedBaseline::fit(&flat, 0, 0).unwrap();
        assert_eq!(Some(3.0), predictor.predict(1, 1));
        assert_eq!(Some(3.0), predictor.predict(42, 42));
    }

    #[test]
    fn should_learn_movie_biases_without_damping() {
        let predictor = BiasedBaseline::fit(&training(), 0, 0).unwrap();
        // mean 3.0, movie 1 bias +2.0, user 1 bias -1/3
        let predicted = predictor.predict(1, 1).unwrap();
        assert!(approx_eq!(f64, 14.0 / 3.0, predicted, epsilon = 1e-9));
        let unknown_user = predictor.predict(77, 2).unwrap();
        assert!(approx_eq!(f64, 5.0 / 3.0, unknown_user, epsilon = 1e-9));
    }

    #[test]
    fn should_shrink_biases_with_damping() {
        let undamped = BiasedBaseline::fit(&training(), 0, 0).unwrap();
        let damped = BiasedBaseline::fit(&training(), 25, 25).unwrap();
        let undamped_prediction = undamped.predict(99, 1).unwrap();
        let damped_prediction = damped.predict(99, 1).unwrap();
        assert!(damped_prediction < undamped_prediction);
        assert!(damped_prediction > 3.0);
    }

    #[test]
    fn should_clamp_to_rating_scale() {
        let training = vec![(1, 1, 5.0), (1, 2, 5.0), (2, 1, 5.0), (3, 3, 1.0)];
        let predictor = BiasedBaseline::fit(&training, 0, 0).unwrap();
        for user_id in 1..4 {
            for movie_id in 1..4 {
                let predicted = predictor.predict(user_id, movie_id).unwrap();
                assert!((MIN_RATING..=MAX_RATING).contains(&predicted));
            }
        }
    }

    #[test]
    fn should_name_parameters() {
        let predictor = BiasedBaseline::fit(&training(), 5, 10).unwrap();
        assert_eq!(
            "BiasedBaseline(movie_damping=5,user_damping=10)",
            predictor.name()
        );
    }
}
