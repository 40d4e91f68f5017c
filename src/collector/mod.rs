pub mod dialog;
pub mod input;
pub mod prompt;

pub use dialog::{Dialog, Outcome, Transition};
pub use input::{parse_period, parse_value, stats_from_pairs};
pub use prompt::{collect_interactive, read_batch};

use thiserror::Error;

use crate::scoring::ScoreError;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("period must be 1, 2 or 3 (got {0:?})")]
    InvalidPeriod(String),

    #[error("{feature} must be a number (got {input:?})")]
    InvalidNumber { feature: String, input: String },

    #[error("malformed stat {0:?}, expected KEY=VALUE")]
    MalformedPair(String),

    #[error("input ended while waiting for {0}")]
    UnexpectedEof(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScoreError> for InputError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::InvalidPeriod(input) => InputError::InvalidPeriod(input),
        }
    }
}
