use crate::error::{RatingsError, Result};
use crate::io::Score;
use crate::metrics::RatingMetric;

pub struct Mae {
    sum_of_absolute_errors: f64,
    qty: usize,
}

impl Default for Mae {
    fn default() -> Self {
        Self::new()
    }
}

impl Mae {
    pub fn new() -> Mae {
        Mae {
            sum_of_absolute_errors: 0_f64,
            qty: 0,
        }
    }
}

impl RatingMetric for Mae {
    fn add(&mut self, predicted: Score, actual: Score) {
        self.sum_of_absolute_errors += (predicted - actual).abs();
        self.qty += 1;
    }

    fn result(&self) -> Result<f64> {
        if self.qty > 0 {
            Ok(self.sum_of_absolute_errors / self.qty as f64)
        } else {
            Err(RatingsError::NoOverlappingObservations)
        }
    }

    fn get_name(&self) -> String {
        "Mae".to_string()
    }
}
