pub mod coverage;
pub mod evaluation_reporter;
pub mod mae;
pub mod rmse;

use hashbrown::HashMap;

use crate::error::Result;
use crate::io::{MovieId, Observation, Score, UserId};
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::metrics::rmse::Rmse;

pub trait RatingMetric {
    fn add(&mut self, predicted: Score, actual: Score);
    fn result(&self) -> Result<f64>;
    fn get_name(&self) -> String;
}

fn index_by_user_and_movie(observations: &[Observation]) -> HashMap<(UserId, MovieId), Vec<Score>> {
    let mut scores_by_key: HashMap<(UserId, MovieId), Vec<Score>> =
        HashMap::with_capacity(observations.len());
    for (user_id, movie_id, score) in observations {
        scores_by_key
            .entry((*user_id, *movie_id))
            .or_insert_with(Vec::new)
            .push(*score);
    }
    scores_by_key
}

/// Inner join of both collections on (user, movie), yielding (predicted, actual) per match.
/// A key present `a` times on one side and `b` times on the other yields `a * b` pairs.
pub fn join_on_user_and_movie(
    predicted: &[Observation],
    actual: &[Observation],
) -> Vec<(Score, Score)> {
    let predicted_by_key = index_by_user_and_movie(predicted);

    actual
        .iter()
        .filter_map(|(user_id, movie_id, actual_score)| {
            predicted_by_key
                .get(&(*user_id, *movie_id))
                .map(|predicted_scores| (predicted_scores, *actual_score))
        })
        .flat_map(|(predicted_scores, actual_score)| {
            predicted_scores
                .iter()
                .map(move |predicted_score| (*predicted_score, actual_score))
        })
        .collect()
}

/// Root mean squared error over all (user, movie) keys present in both collections.
/// Keys present on only one side are ignored; no overlap at all is an error.
pub fn compute_rmse(predicted: &[Observation], actual: &[Observation]) -> Result<f64> {
    let mut rmse = Rmse::new();
    for (predicted_score, actual_score) in join_on_user_and_movie(predicted, actual) {
        rmse.add(predicted_score, actual_score);
    }
    rmse.result()
}

pub fn evaluate(predicted: &[Observation], actual: &[Observation]) -> EvaluationReporter {
    let predicted_by_key = index_by_user_and_movie(predicted);
    let mut reporter = EvaluationReporter::new(actual.len());
    for (user_id, movie_id, actual_score) in actual {
        if let Some(predicted_scores) = predicted_by_key.get(&(*user_id, *movie_id)) {
            reporter.add_covered(predicted_scores, *actual_score);
        }
    }
    reporter
}
