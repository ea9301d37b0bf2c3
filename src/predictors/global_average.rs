use crate::dataframeutils;
use crate::error::Result;
use crate::io::{MovieId, Observation, Score, UserId};
use crate::predictors::RatingPredictor;

/// Predicts the mean training rating for everything.
pub struct GlobalAverage {
    average: Score,
}

impl GlobalAverage {
    pub fn fit(training: &[Observation]) -> Result<GlobalAverage> {
        let average = dataframeutils::global_average(training)?;
        Ok(GlobalAverage { average })
    }

    pub fn average(&self) -> Score {
        self.average
    }
}

impl RatingPredictor for GlobalAverage {
    fn predict(&self, _user_id: UserId, _movie_id: MovieId) -> Option<Score> {
        Some(self.average)
    }

    fn name(&self) -> String {
        "GlobalAverage".to_string()
    }
}
