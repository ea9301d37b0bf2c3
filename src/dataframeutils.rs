use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use rayon::prelude::*;
use tdigest::TDigest;
use tracing::info;

use crate::error::{RatingsError, Result};
use crate::io::{MovieId, Observation, Score};
use crate::ranking::ScoredLabel;

pub struct DatasetStats {
    pub descriptive_name: String,
    pub qty_records: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_movie_ids: usize,
    pub mean_rating: f64,
    pub ratings_per_movie_p25: f64,
    pub ratings_per_movie_p50: f64,
    pub ratings_per_movie_p75: f64,
    pub ratings_per_movie_p90: f64,
    pub ratings_per_movie_p99: f64,
    pub ratings_per_movie_p100: f64,
}

/// Number of scores and their mean for a single movie.
pub fn counts_and_averages(scores: &[Score]) -> Result<(usize, f64)> {
    if scores.is_empty() {
        return Err(RatingsError::EmptyScores);
    }
    let qty = scores.len();
    let sum: f64 = scores.iter().sum();
    Ok((qty, sum / qty as f64))
}

pub fn global_average(ratings: &[Observation]) -> Result<f64> {
    let scores = ratings.iter().map(|(_, _, score)| *score).collect_vec();
    counts_and_averages(&scores).map(|(_qty, average)| average)
}

pub fn group_scores_by_movie(ratings: &[Observation]) -> HashMap<MovieId, Vec<Score>> {
    ratings
        .iter()
        .map(|(_user_id, movie_id, score)| (*movie_id, *score))
        .into_group_map()
        .into_iter()
        .collect()
}

/// (number of ratings, average rating) per movie.
pub fn movie_ids_with_avg_ratings(ratings: &[Observation]) -> HashMap<MovieId, (usize, f64)> {
    group_scores_by_movie(ratings)
        .into_par_iter()
        .filter_map(|(movie_id, scores)| {
            counts_and_averages(&scores)
                .ok()
                .map(|counts_and_average| (movie_id, counts_and_average))
        })
        .collect()
}

/// Joins titles with per-movie aggregates into (average rating, title, number of ratings).
pub fn movie_names_with_avg_ratings(
    movies: &HashMap<MovieId, String>,
    avg_ratings: &HashMap<MovieId, (usize, f64)>,
) -> Vec<ScoredLabel> {
    avg_ratings
        .iter()
        .filter_map(|(movie_id, (qty, average))| {
            movies
                .get(movie_id)
                .map(|title| ScoredLabel::new(*average, title.as_str(), *qty))
        })
        .collect()
}

/// Joins predicted ratings with titles and rating counts into
/// (predicted rating, title, number of ratings).
pub fn predictions_with_names_and_counts(
    predictions: &[Observation],
    movies: &HashMap<MovieId, String>,
    avg_ratings: &HashMap<MovieId, (usize, f64)>,
) -> Vec<ScoredLabel> {
    predictions
        .iter()
        .filter_map(|(_user_id, movie_id, predicted)| {
            let title = movies.get(movie_id)?;
            let (qty, _average) = avg_ratings.get(movie_id)?;
            Some(ScoredLabel::new(*predicted, title.as_str(), *qty))
        })
        .collect()
}

pub fn determine_dataset_statistics(
    descriptive_name: &str,
    ratings: &[Observation],
) -> Result<DatasetStats> {
    let qty_records = ratings.len();
    let mean_rating = global_average(ratings)?;

    let qty_unique_user_ids = ratings
        .par_iter()
        .map(|(user_id, _movie_id, _score)| *user_id)
        .collect::<HashSet<_>>()
        .len();

    let ratings_per_movie = ratings
        .iter()
        .map(|(_user_id, movie_id, _score)| *movie_id)
        .counts()
        .into_values()
        .map(|qty| qty as f64)
        .collect_vec();
    let qty_unique_movie_ids = ratings_per_movie.len();

    let digest = TDigest::new_with_size(100).merge_unsorted(ratings_per_movie);

    let stats = DatasetStats {
        descriptive_name: descriptive_name.to_string(),
        qty_records,
        qty_unique_user_ids,
        qty_unique_movie_ids,
        mean_rating,
        ratings_per_movie_p25: digest.estimate_quantile(0.25),
        ratings_per_movie_p50: digest.estimate_quantile(0.50),
        ratings_per_movie_p75: digest.estimate_quantile(0.75),
        ratings_per_movie_p90: digest.estimate_quantile(0.90),
        ratings_per_movie_p99: digest.estimate_quantile(0.99),
        ratings_per_movie_p100: digest.max(),
    };

    info!("Loaded {}", stats.descriptive_name);
    info!("\tRatings: {}", stats.qty_records.to_formatted_string(&Locale::en));
    info!("\tUsers: {}", stats.qty_unique_user_ids.to_formatted_string(&Locale::en));
    info!("\tMovies: {}", stats.qty_unique_movie_ids.to_formatted_string(&Locale::en));
    info!("\tMean rating: {:.4}", stats.mean_rating);
    info!(
        "\tRatings per movie: p25={:.0} p50={:.0} p75={:.0} p90={:.0} p99={:.0} p100={:.0}",
        stats.ratings_per_movie_p25,
        stats.ratings_per_movie_p50,
        stats.ratings_per_movie_p75,
        stats.ratings_per_movie_p90,
        stats.ratings_per_movie_p99,
        stats.ratings_per_movie_p100,
    );

    Ok(stats)
}

#[cfg(test)]
mod dataframeutils_test {
    use super::*;
    use float_cmp::approx_eq;

    fn movies() -> HashMap<MovieId, String> {
        let mut movies = HashMap::new();
        movies.insert(1, "Toy Story (1995)".to_string());
        movies.insert(2, "Jumanji (1995)".to_string());
        movies.insert(3, "Grumpier Old Men (1995)".to_string());
        movies
    }

    fn ratings() -> Vec<Observation> {
        vec![
            (1, 1, 5.0),
            (2, 1, 4.0),
            (3, 1, 3.0),
            (1, 2, 2.0),
            (2, 2, 3.0),
            (4, 4, 1.0),
        ]
    }

    #[test]
    fn should_count_and_average() {
        assert_eq!((3, 20.0), counts_and_averages(&[10.0, 20.0, 30.0]).unwrap());
        assert_eq!((4, 2.5), counts_and_averages(&[1.0, 2.0, 3.0, 4.0]).unwrap());
        let zero_to_nineteen = (0..20).map(|value| value as f64).collect_vec();
        assert_eq!((20, 9.5), counts_and_averages(&zero_to_nineteen).unwrap());
    }

    #[test]
    fn should_refuse_empty_scores() {
        assert!(matches!(counts_and_averages(&[]), Err(RatingsError::EmptyScores)));
        assert!(matches!(global_average(&[]), Err(RatingsError::EmptyScores)));
    }

    #[test]
    fn should_group_scores_by_movie() {
        let grouped = group_scores_by_movie(&ratings());
        assert_eq!(3, grouped.len());
        assert_eq!(vec![5.0, 4.0, 3.0], grouped[&1]);
        assert_eq!(vec![2.0, 3.0], grouped[&2]);
    }

    #[test]
    fn should_compute_avg_ratings_per_movie() {
        let avg_ratings = movie_ids_with_avg_ratings(&ratings());
        assert_eq!((3, 4.0), avg_ratings[&1]);
        assert_eq!((2, 2.5), avg_ratings[&2]);
        assert_eq!((1, 1.0), avg_ratings[&4]);
    }

    #[test]
    fn should_join_names_only_for_known_movies() {
        let avg_ratings = movie_ids_with_avg_ratings(&ratings());
        let mut named = movie_names_with_avg_ratings(&movies(), &avg_ratings);
        named.sort();
        assert_eq!(
            vec![
                ScoredLabel::new(4.0, "Toy Story (1995)", 3),
                ScoredLabel::new(2.5, "Jumanji (1995)", 2),
            ],
            named
        );
    }

    #[test]
    fn should_join_predictions_with_names_and_counts() {
        let avg_ratings = movie_ids_with_avg_ratings(&ratings());
        let predictions = vec![(0, 1, 4.2), (0, 3, 3.9), (0, 2, 4.8)];
        let mut joined = predictions_with_names_and_counts(&predictions, &movies(), &avg_ratings);
        joined.sort();
        // movie 3 has a title but nobody rated it
        assert_eq!(
            vec![
                ScoredLabel::new(4.8, "Jumanji (1995)", 2),
                ScoredLabel::new(4.2, "Toy Story (1995)", 3),
            ],
            joined
        );
    }

    #[test]
    fn should_determine_dataset_statistics() {
        let stats = determine_dataset_statistics("tiny", &ratings()).unwrap();
        assert_eq!(6, stats.qty_records);
        assert_eq!(4, stats.qty_unique_user_ids);
        assert_eq!(3, stats.qty_unique_movie_ids);
        assert!(approx_eq!(f64, 3.0, stats.mean_rating, ulps = 2));
        assert!(approx_eq!(f64, 3.0, stats.ratings_per_movie_p100, ulps = 2));
    }
}
