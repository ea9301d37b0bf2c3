use crate::error::{RatingsError, Result};
use crate::io::Score;
use crate::metrics::RatingMetric;

pub struct Rmse {
    sum_of_squared_errors: f64,
    qty: usize,
}

impl Default for Rmse {
    fn default() -> Self {
        Self::new()
    }
}

impl Rmse {
    pub fn new() -> Rmse {
        Rmse {
            sum_of_squared_errors: 0_f64,
            qty: 0,
        }
    }

    pub fn qty(&self) -> usize {
        self.qty
    }
}

impl RatingMetric for Rmse {
    fn add(&mut self, predicted: Score, actual: Score) {
        let error = predicted - actual;
        self.sum_of_squared_errors += error * error;
        self.qty += 1;
    }

    fn result(&self) -> Result<f64> {
        if self.qty > 0 {
            Ok((self.sum_of_squared_errors / self.qty as f64).sqrt())
        } else {
            Err(RatingsError::NoOverlappingObservations)
        }
    }

    fn get_name(&self) -> String {
        "Rmse".to_string()
    }
}
