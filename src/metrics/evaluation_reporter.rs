use crate::error::Result;
use crate::io::Score;
use crate::metrics::coverage::Coverage;
use crate::metrics::mae::Mae;
use crate::metrics::rmse::Rmse;
use crate::metrics::RatingMetric;

pub struct EvaluationReporter {
    rmse: Rmse,
    mae: Mae,
    coverage: Coverage,
}

impl EvaluationReporter {
    pub fn new(qty_actual: usize) -> EvaluationReporter {
        EvaluationReporter {
            rmse: Rmse::new(),
            mae: Mae::new(),
            coverage: Coverage::new(qty_actual),
        }
    }
}

impl EvaluationReporter {
    pub fn add(&mut self, predicted: Score, actual: Score) {
        self.rmse.add(predicted, actual);
        self.mae.add(predicted, actual);
    }

    /// Records one actual observation together with every prediction made for its key.
    pub fn add_covered(&mut self, predicted: &[Score], actual: Score) {
        if predicted.is_empty() {
            return;
        }
        self.coverage.add_covered();
        for predicted_score in predicted {
            self.add(*predicted_score, actual);
        }
    }

    pub fn qty_pairs(&self) -> usize {
        self.rmse.qty()
    }

    pub fn result(&self) -> Result<String> {
        let rmse_score = format!("{:.4}", self.rmse.result()?);
        let mae_score = format!("{:.4}", self.mae.result()?);
        let coverage_score = format!("{:.4}", self.coverage.result()?);
        Ok(format!("{},{},{}", rmse_score, mae_score, coverage_score))
    }

    pub fn get_name(&self) -> String {
        let rmse_name = self.rmse.get_name();
        let mae_name = self.mae.get_name();
        let coverage_name = self.coverage.get_name();
        format!("{},{},{}", rmse_name, mae_name, coverage_name)
    }
}
