use std::time::Instant;
use tdigest::TDigest;

/// Collects wall clock durations of repeated steps, e.g. one `predict_all` per test user.
#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    durations_in_micros: Vec<f64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            durations_in_micros: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self) {
        let duration = self.start_time.elapsed();
        self.durations_in_micros.push(duration.as_micros() as f64);
    }

    pub fn get_n(&self) -> usize {
        self.durations_in_micros.len()
    }

    /// `percentile` in [0, 100]. Zero when nothing was measured yet.
    pub fn get_percentile_in_micros(&self, percentile: f64) -> f64 {
        if self.durations_in_micros.is_empty() {
            return 0.0;
        }
        let t_digest = TDigest::new_with_size(100);
        let sorted_digest = t_digest.merge_unsorted(self.durations_in_micros.clone());
        sorted_digest.estimate_quantile(percentile / 100.0)
    }
}
