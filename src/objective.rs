use crate::error::Result;
use crate::io::Observation;
use crate::metrics;
use crate::predictors::biased_baseline::BiasedBaseline;
use crate::predictors::{for_predict, RatingPredictor};

// objective function, lower is better
pub fn objective(
    training: &[Observation],
    validation: &[Observation],
    movie_damping: usize,
    user_damping: usize,
) -> Result<f64> {
    let model = BiasedBaseline::fit(training, movie_damping, user_damping)?;
    let predicted_ratings = model.predict_all(&for_predict(validation));
    metrics::compute_rmse(&predicted_ratings, validation)
}

#[cfg(test)]
mod objective_test {
    use super::*;

    #[test]
    fn should_prefer_movie_biases_on_consistent_movies() {
        let training = vec![
            (1, 1, 5.0),
            (2, 1, 5.0),
            (3, 1, 5.0),
            (1, 2, 1.0),
            (2, 2, 1.0),
            (3, 2, 1.0),
        ];
        let validation = vec![(4, 1, 5.0), (4, 2, 1.0)];

        let undamped = objective(&training, &validation, 0, 0).unwrap();
        let heavily_damped = objective(&training, &validation, 1000, 1000).unwrap();
        assert!(undamped < 1e-9);
        assert!(heavily_damped > undamped);
    }

    #[test]
    fn should_fail_without_validation_data() {
        let training = vec![(1, 1, 4.0)];
        assert!(objective(&training, &[], 0, 0).is_err());
    }
}
