use anyhow::Context;
use num_format::{Locale, ToFormattedString};
use tracing::info;

use ratingmetrics::config::AppConfig;
use ratingmetrics::ranking::{select_top_k, ScoredLabel};
use ratingmetrics::{dataframeutils, io, logging};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    logging::init(&config.log.level);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.num_workers)
        .build_global()?;

    let ratings_path = config.data.ratings_path()?;
    let movies_path = config.data.movies_path()?;

    info!("Reading ratings from {}", ratings_path);
    let ratings = io::read_ratings(ratings_path)
        .with_context(|| format!("Could not read ratings from {}", ratings_path))?;
    info!("Reading movies from {}", movies_path);
    let movies = io::read_movies(movies_path)
        .with_context(|| format!("Could not read movies from {}", movies_path))?;

    println!(
        "There are {} ratings and {} movies in the datasets",
        ratings.len().to_formatted_string(&Locale::en),
        movies.len().to_formatted_string(&Locale::en)
    );

    dataframeutils::determine_dataset_statistics(ratings_path, &ratings)?;

    let avg_ratings = dataframeutils::movie_ids_with_avg_ratings(&ratings);
    let movie_names_with_avg_ratings =
        dataframeutils::movie_names_with_avg_ratings(&movies, &avg_ratings);

    let num_top_movies = config.ranking.num_top_movies;
    let min_support = config.ranking.min_support;

    println!("===============================================================");
    println!(
        "Movies with highest ratings (more than {} ratings):",
        min_support
    );
    println!("(average rating, movie name, number of ratings)");
    let highest_rated = select_top_k(
        movie_names_with_avg_ratings.iter().cloned(),
        num_top_movies,
        min_support,
    );
    print_ranking(&highest_rated);

    // Rank by popularity instead: the number of ratings becomes the score.
    println!("===============================================================");
    println!("Most rated movies:");
    println!("(number of ratings, movie name)");
    let most_rated = select_top_k(
        movie_names_with_avg_ratings.iter().map(|entry| {
            ScoredLabel::new(entry.support as f64, entry.label.as_str(), entry.support)
        }),
        num_top_movies,
        0,
    );
    for entry in most_rated {
        println!("({}, {})", entry.support, entry.label);
    }

    Ok(())
}

fn print_ranking(ranking: &[ScoredLabel]) {
    for entry in ranking {
        println!("({:.4}, {}, {})", entry.score, entry.label, entry.support);
    }
}
