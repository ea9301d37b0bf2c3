use anyhow::{bail, Context};
use hashbrown::HashSet;
use tracing::info;

use ratingmetrics::config::AppConfig;
use ratingmetrics::io::{MovieId, Observation, UserId};
use ratingmetrics::predictors::biased_baseline::BiasedBaseline;
use ratingmetrics::predictors::{for_predict, RatingPredictor};
use ratingmetrics::ranking::select_top_k;
use ratingmetrics::{dataframeutils, io, logging, metrics, split};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    logging::init(&config.log.level);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.num_workers)
        .build_global()?;

    let ratings_path = config.data.ratings_path()?;
    let movies_path = config.data.movies_path()?;
    let my_ratings_path = config.data.my_ratings_path()?;
    let my_user_id = config.recommend.user_id;

    let ratings = io::read_ratings(ratings_path)
        .with_context(|| format!("Could not read ratings from {}", ratings_path))?;
    let movies = io::read_movies(movies_path)
        .with_context(|| format!("Could not read movies from {}", movies_path))?;

    // Personal ratings use the prediction layout `UserID::MovieID::Rating`, the user id column
    // is overwritten with recommend.user_id.
    let my_ratings: Vec<Observation> = io::read_predictions(my_ratings_path)
        .with_context(|| format!("Could not read personal ratings from {}", my_ratings_path))?
        .into_iter()
        .map(|(_user_id, movie_id, score)| (my_user_id, movie_id, score))
        .collect();
    if my_ratings.is_empty() {
        bail!("{} does not contain any ratings", my_ratings_path);
    }
    if ratings.iter().any(|(user_id, _, _)| *user_id == my_user_id) {
        bail!(
            "User id {} is already taken in {}, configure another recommend.user_id",
            my_user_id,
            ratings_path
        );
    }
    info!("My movie ratings: {:?}", &my_ratings[..my_ratings.len().min(10)]);

    let splits = split::random_split(&ratings, &config.split.weights, config.split.seed)?;
    let (training, test) = match splits.as_slice() {
        [training, _validation, test] => (training, test),
        _ => bail!("split.weights needs exactly three weights (training, validation, test)"),
    };

    let mut training_with_my_ratings = training.clone();
    training_with_my_ratings.extend_from_slice(&my_ratings);
    info!(
        "The training dataset now has {} more entries than the original training dataset",
        training_with_my_ratings.len() - training.len()
    );

    let model = BiasedBaseline::fit(
        &training_with_my_ratings,
        config.model.movie_damping,
        config.model.user_damping,
    )?;

    let predicted_test = model.predict_all(&for_predict(test));
    let test_rmse = metrics::compute_rmse(&predicted_test, test)?;
    println!("The model had a RMSE on the test set of {:.6}", test_rmse);

    let my_rated_movie_ids: HashSet<MovieId> =
        my_ratings.iter().map(|(_, movie_id, _)| *movie_id).collect();
    let my_unrated_movies: Vec<(UserId, MovieId)> = movies
        .keys()
        .filter(|movie_id| !my_rated_movie_ids.contains(*movie_id))
        .map(|movie_id| (my_user_id, *movie_id))
        .collect();
    let predicted_ratings = model.predict_all(&my_unrated_movies);

    if let Some(predictions_out_path) = &config.recommend.predictions_out_path {
        io::write_predictions(predictions_out_path, &predicted_ratings)?;
        info!("Wrote {} predictions to {}", predicted_ratings.len(), predictions_out_path);
    }

    let avg_ratings = dataframeutils::movie_ids_with_avg_ratings(&ratings);
    let ratings_with_names = dataframeutils::predictions_with_names_and_counts(
        &predicted_ratings,
        &movies,
        &avg_ratings,
    );
    let highest_predicted = select_top_k(
        ratings_with_names,
        config.recommend.num_recommendations,
        config.recommend.min_support,
    );

    println!(
        "My highest rated movies as predicted (for movies with more than {} reviews):",
        config.recommend.min_support
    );
    for entry in highest_predicted {
        println!("({:.4}, {}, {})", entry.score, entry.label, entry.support);
    }

    Ok(())
}
