use crate::error::{RatingsError, Result};

/// Fraction of actual observations for which at least one prediction exists.
pub struct Coverage {
    qty_actual: usize,
    qty_covered: usize,
}

impl Coverage {
    pub fn new(qty_actual: usize) -> Coverage {
        Coverage {
            qty_actual,
            qty_covered: 0,
        }
    }

    pub fn add_covered(&mut self) {
        self.qty_covered += 1;
    }

    pub fn result(&self) -> Result<f64> {
        if self.qty_actual > 0 {
            Ok(self.qty_covered as f64 / self.qty_actual as f64)
        } else {
            Err(RatingsError::InvalidArgument(
                "coverage needs at least one actual observation".to_string(),
            ))
        }
    }

    pub fn get_name(&self) -> String {
        "Coverage".to_string()
    }
}
