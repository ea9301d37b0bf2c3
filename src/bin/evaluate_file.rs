use anyhow::Context;
use tracing::{info, warn};

use ratingmetrics::config::AppConfig;
use ratingmetrics::{io, logging, metrics};

fn main() -> anyhow::Result<()> {
    // This tool evaluates predictions made by an external model and stored as a file
    // (`UserID::MovieID::Rating` per line) against the actual ratings.
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    logging::init(&config.log.level);

    let ratings_path = config.data.ratings_path()?;
    let predictions_path = config.data.predictions_path()?;

    let actual = io::read_ratings(ratings_path)
        .with_context(|| format!("Could not read ratings from {}", ratings_path))?;
    let predicted = io::read_predictions(predictions_path)
        .with_context(|| format!("Could not read predictions from {}", predictions_path))?;
    info!(
        "Evaluating {} predictions against {} ratings",
        predicted.len(),
        actual.len()
    );

    let reporter = metrics::evaluate(&predicted, &actual);
    if reporter.qty_pairs() == 0 {
        warn!("None of the predictions matches a rating on (user, movie)");
    } else {
        info!("Joined {} (predicted, actual) pairs", reporter.qty_pairs());
    }

    println!("{}", reporter.get_name());
    println!("{}", reporter.result()?);

    Ok(())
}
