use std::collections::BTreeMap;

use anyhow::{anyhow, Context};
use csv::Writer;
use indicatif::ProgressBar;
use serde_derive::Serialize;
use tracing::{info, warn};

use ratingmetrics::config::AppConfig;
use ratingmetrics::hyperparameter::hyperparamgrid::HyperParamGrid;
use ratingmetrics::metrics;
use ratingmetrics::predictors::biased_baseline::BiasedBaseline;
use ratingmetrics::predictors::global_average::GlobalAverage;
use ratingmetrics::predictors::{for_predict, pairs_by_user, RatingPredictor};
use ratingmetrics::stopwatch::Stopwatch;
use ratingmetrics::{io, logging, objective, split};

const MOVIE_DAMPING: &str = "movie_damping";
const USER_DAMPING: &str = "user_damping";

#[derive(Serialize)]
struct GridSearchRecord {
    iteration: usize,
    movie_damping: usize,
    user_damping: usize,
    validation_rmse: f64,
}

fn main() -> anyhow::Result<()> {
    // get params from config file
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    logging::init(&config.log.level);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.num_workers)
        .build_global()?;

    let ratings_path = config.data.ratings_path()?;
    info!("Reading ratings from {}", ratings_path);
    let ratings = io::read_ratings(ratings_path)
        .with_context(|| format!("Could not read ratings from {}", ratings_path))?;

    let splits = split::random_split(&ratings, &config.split.weights, config.split.seed)?;
    let (training, validation, test) = match splits.as_slice() {
        [training, validation, test] => (training, validation, test),
        _ => {
            return Err(anyhow!(
                "split.weights needs exactly three weights (training, validation, test), got {:?}",
                config.split.weights
            ))
        }
    };
    info!(
        "Training: {}, validation: {}, test: {}",
        training.len(),
        validation.len(),
        test.len()
    );

    let mut param_grid = BTreeMap::new();
    param_grid.insert(
        MOVIE_DAMPING.to_string(),
        config.hyperparam.movie_damping_choices.clone(),
    );
    param_grid.insert(
        USER_DAMPING.to_string(),
        config.hyperparam.user_damping_choices.clone(),
    );
    let grid = HyperParamGrid { param_grid };

    let combinations = grid.get_combinations(config.hyperparam.num_iterations, config.split.seed);
    info!(
        "Evaluating {} of {} hyperparameter combinations",
        combinations.len(),
        grid.get_qty_combinations()
    );

    // Progress bar
    let pb = ProgressBar::new(combinations.len() as u64);

    let mut wtr = if config.hyperparam.save_records {
        // csv writer for storing all values of the whole procedure
        Some(Writer::from_path(&config.hyperparam.out_path)?)
    } else {
        None
    };

    let mut best_value = f64::INFINITY;
    let mut best_combination = None;

    // grid search, lower validation error is better
    for (iteration, combination) in combinations.into_iter().enumerate() {
        pb.inc(1);
        let movie_damping = combination[MOVIE_DAMPING];
        let user_damping = combination[USER_DAMPING];
        let validation_rmse =
            objective::objective(training, validation, movie_damping, user_damping)?;
        info!(
            "For movie_damping {} and user_damping {} the RMSE is {:.6}",
            movie_damping, user_damping, validation_rmse
        );

        if let Some(wtr) = wtr.as_mut() {
            wtr.serialize(GridSearchRecord {
                iteration,
                movie_damping,
                user_damping,
                validation_rmse,
            })?;
        }

        if validation_rmse < best_value {
            best_value = validation_rmse;
            best_combination = Some((movie_damping, user_damping));
        }
    }
    pb.finish_and_clear();

    if let Some(wtr) = wtr.as_mut() {
        wtr.flush()?;
    }

    let (best_movie_damping, best_user_damping) = match best_combination {
        Some(best) => best,
        None => {
            warn!("Empty hyperparameter grid, falling back to the configured model");
            (config.model.movie_damping, config.model.user_damping)
        }
    };

    let test_for_predicting = for_predict(test);

    let best_model = BiasedBaseline::fit(training, best_movie_damping, best_user_damping)?;
    let predicted_test = best_model.predict_all(&test_for_predicting);
    let reporter = metrics::evaluate(&predicted_test, test);

    // latency of the best model, one request per test user
    let mut stopwatch = Stopwatch::new();
    for user_pairs in pairs_by_user(test) {
        stopwatch.start();
        let _ = best_model.predict_all(&user_pairs);
        stopwatch.stop();
    }

    let global_average = GlobalAverage::fit(training)?;
    let predicted_test_avg = global_average.predict_all(&test_for_predicting);
    let test_avg_rmse = metrics::compute_rmse(&predicted_test_avg, test)?;

    println!("===============================================================");
    println!("===               START EVALUATING TEST SET                ====");
    println!("===============================================================");
    println!("Best model: {}", best_model.name());
    println!("Best validation RMSE: {:.6}", best_value);
    println!("{}", reporter.get_name());
    println!("{}", reporter.result()?);
    println!(
        "The average rating for movies in the training set is {:.6}",
        global_average.average()
    );
    println!("The RMSE on the average set is {:.6}", test_avg_rmse);
    println!("Qty test predictions: {}", predicted_test.len());
    println!("Prediction latency of the best model over {} users", stopwatch.get_n());
    println!("p50 (microseconds): {}", stopwatch.get_percentile_in_micros(50.0));
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(90.0));
    println!("p100 (microseconds): {}", stopwatch.get_percentile_in_micros(100.0));

    Ok(())
}
