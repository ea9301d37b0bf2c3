pub mod config;
pub mod config_processors;
pub mod dataframeutils;
pub mod error;
pub mod hyperparameter;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod objective;
pub mod predictors;
pub mod ranking;
pub mod split;
pub mod stopwatch;

pub use error::RatingsError;
