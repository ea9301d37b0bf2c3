use thiserror::Error;

use crate::io::MovieId;

pub type Result<T> = std::result::Result<T, RatingsError>;

#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line_number}: {reason} in {line:?}")]
    Parse {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("cannot aggregate an empty sequence of scores")]
    EmptyScores,

    #[error("no overlapping (user, movie) observations between predicted and actual ratings")]
    NoOverlappingObservations,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("movie {0} is listed more than once")]
    DuplicateMovie(MovieId),

    #[error("configuration error: {0}")]
    Config(String),
}
