use hashbrown::HashMap;
use rayon::iter::ParallelBridge;
use rayon::prelude::ParallelIterator;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{RatingsError, Result};

pub type UserId = u32;
pub type MovieId = u32;
pub type Score = f64;
pub type Observation = (UserId, MovieId, Score);

const FIELD_SEPARATOR: &str = "::";

/// Parses `UserID::MovieID::Rating::Timestamp`. The timestamp has to be an integer but is dropped.
pub fn parse_rating(line: &str, line_number: usize) -> Result<Observation> {
    let fields = split_fields(line, line_number, 4)?;
    let observation = (
        parse_field::<UserId>(fields[0], "user id", line, line_number)?,
        parse_field::<MovieId>(fields[1], "movie id", line, line_number)?,
        parse_score(fields[2], line, line_number)?,
    );
    parse_field::<i64>(fields[3], "timestamp", line, line_number)?;
    Ok(observation)
}

/// Parses `MovieID::Title::Genres`, genres are ignored.
pub fn parse_movie(line: &str, line_number: usize) -> Result<(MovieId, String)> {
    let fields = split_fields(line, line_number, 3)?;
    let movie_id = parse_field::<MovieId>(fields[0], "movie id", line, line_number)?;
    Ok((movie_id, fields[1].to_string()))
}

/// Parses `UserID::MovieID::Rating` as written by an external model.
pub fn parse_prediction(line: &str, line_number: usize) -> Result<Observation> {
    let fields = split_fields(line, line_number, 3)?;
    Ok((
        parse_field::<UserId>(fields[0], "user id", line, line_number)?,
        parse_field::<MovieId>(fields[1], "movie id", line, line_number)?,
        parse_score(fields[2], line, line_number)?,
    ))
}

fn split_fields<'a>(line: &'a str, line_number: usize, expected: usize) -> Result<Vec<&'a str>> {
    let fields = line.split(FIELD_SEPARATOR).collect::<Vec<_>>();
    if fields.len() != expected {
        return Err(RatingsError::Parse {
            line_number,
            line: line.to_string(),
            reason: format!("expected {} fields but found {}", expected, fields.len()),
        });
    }
    Ok(fields)
}

fn parse_field<T: FromStr>(raw: &str, what: &str, line: &str, line_number: usize) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| RatingsError::Parse {
        line_number,
        line: line.to_string(),
        reason: format!("invalid {} {:?}", what, raw),
    })
}

/// `f64::from_str` accepts `NaN` and `inf`, neither is a rating.
fn parse_score(raw: &str, line: &str, line_number: usize) -> Result<Score> {
    let score = parse_field::<Score>(raw, "rating", line, line_number)?;
    if !score.is_finite() {
        return Err(RatingsError::Parse {
            line_number,
            line: line.to_string(),
            reason: format!("invalid rating {:?}", raw),
        });
    }
    Ok(score)
}

pub fn read_ratings<P: AsRef<Path>>(ratings_path: P) -> Result<Vec<Observation>> {
    read_records(ratings_path, parse_rating)
}

pub fn read_predictions<P: AsRef<Path>>(predictions_path: P) -> Result<Vec<Observation>> {
    read_records(predictions_path, parse_prediction)
}

pub fn read_movies<P: AsRef<Path>>(movies_path: P) -> Result<HashMap<MovieId, String>> {
    let movies = read_records(movies_path, parse_movie)?;
    let mut titles = HashMap::with_capacity(movies.len());
    for (movie_id, title) in movies {
        if titles.insert(movie_id, title).is_some() {
            return Err(RatingsError::DuplicateMovie(movie_id));
        }
    }
    Ok(titles)
}

/// Reads every non-blank line of a file and parses it in parallel. The first malformed line
/// (by line number) is reported.
fn read_records<P, T, F>(path: P, parse: F) -> Result<Vec<T>>
where
    P: AsRef<Path>,
    T: Send,
    F: Fn(&str, usize) -> Result<T> + Sync + Send,
{
    let line_iterator = create_buffered_line_reader(path)?;
    let parsed = line_iterator
        .enumerate()
        .par_bridge()
        .filter_map(|(index, result)| match result {
            Ok(rawline) if rawline.trim().is_empty() => None,
            Ok(rawline) => Some(parse(&rawline, index + 1)),
            Err(error) => Some(Err(RatingsError::Io(error))),
        })
        .collect::<Vec<_>>();

    let mut records = Vec::with_capacity(parsed.len());
    let mut first_failure: Option<RatingsError> = None;
    for result in parsed {
        match result {
            Ok(record) => records.push(record),
            Err(error) => {
                if is_earlier(&error, first_failure.as_ref()) {
                    first_failure = Some(error);
                }
            }
        }
    }
    match first_failure {
        Some(error) => Err(error),
        None => Ok(records),
    }
}

fn is_earlier(candidate: &RatingsError, current: Option<&RatingsError>) -> bool {
    match (candidate, current) {
        (_, None) => true,
        (
            RatingsError::Parse { line_number: a, .. },
            Some(RatingsError::Parse { line_number: b, .. }),
        ) => a < b,
        _ => false,
    }
}

fn create_buffered_line_reader<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[Observation]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for (user_id, movie_id, score) in predictions {
        writeln!(out, "{}::{}::{}", user_id, movie_id, score)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod io_test {
    use super::*;
    use std::io::Write;

    fn file_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn should_parse_rating_and_drop_timestamp() {
        let rating = parse_rating("1::1193::5::978300760", 1).unwrap();
        assert_eq!((1, 1193, 5.0), rating);
    }

    #[test]
    fn should_parse_movie_and_drop_genres() {
        let (movie_id, title) =
            parse_movie("1::Toy Story (1995)::Animation|Children's|Comedy", 1).unwrap();
        assert_eq!(1, movie_id);
        assert_eq!("Toy Story (1995)", title);
    }

    #[test]
    fn should_name_line_with_wrong_field_count() {
        match parse_rating("1::1193::5", 7) {
            Err(RatingsError::Parse { line_number, line, .. }) => {
                assert_eq!(7, line_number);
                assert_eq!("1::1193::5", line);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn should_reject_non_numeric_rating() {
        let error = parse_prediction("1::2::five", 3).unwrap_err();
        assert!(error.to_string().contains("line 3"));
        assert!(error.to_string().contains("rating"));
    }

    #[test]
    fn should_reject_non_finite_ratings() {
        for raw in &["NaN", "inf", "-inf", "infinity"] {
            let rating_line = format!("1::2::{}::978300760", raw);
            match parse_rating(&rating_line, 4) {
                Err(RatingsError::Parse { line_number, reason, .. }) => {
                    assert_eq!(4, line_number);
                    assert!(reason.contains("rating"));
                }
                other => panic!("unexpected {:?}", other),
            }
            assert!(parse_prediction(&format!("1::2::{}", raw), 1).is_err());
        }
    }

    #[test]
    fn should_read_ratings_skipping_blank_lines() {
        let file = file_with("1::1::5::978300760\n\n2::1::3::978300761\n");
        let mut ratings = read_ratings(file.path()).unwrap();
        ratings.sort_by_key(|(user_id, _, _)| *user_id);
        assert_eq!(vec![(1, 1, 5.0), (2, 1, 3.0)], ratings);
    }

    #[test]
    fn should_report_first_malformed_line() {
        let file = file_with("1::1::5::1\n2::x::3::1\n3::1::4::1\nbroken\n");
        match read_ratings(file.path()) {
            Err(RatingsError::Parse { line_number, .. }) => assert_eq!(2, line_number),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn should_reject_duplicate_movies() {
        let file = file_with("1::Toy Story (1995)::Comedy\n1::Jumanji (1995)::Adventure\n");
        assert!(matches!(read_movies(file.path()), Err(RatingsError::DuplicateMovie(1))));
    }

    #[test]
    fn should_write_predictions_readable_again() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_predictions(file.path(), &[(1, 2, 3.5), (4, 5, 1.25)]).unwrap();
        let mut predictions = read_predictions(file.path()).unwrap();
        predictions.sort_by_key(|(user_id, _, _)| *user_id);
        assert_eq!(vec![(1, 2, 3.5), (4, 5, 1.25)], predictions);
    }
}
