use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Reasons a submitted answer is rejected. None of these advance the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a numeric value before continuing.")]
    MissingValue,
    #[error("Invalid value `{0}`. Enter a number that is zero or greater.")]
    NotNonNegative(String),
    #[error("The quiz is not waiting for an answer.")]
    NotAsking,
}

/// Failures of the compute call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    #[error("Could not reach the calculation service: {0}")]
    Transport(String),
    #[error("The calculation service answered with HTTP status {0}")]
    Status(u16),
    #[error("The calculation service sent an unexpected response: {0}")]
    Malformed(String),
    /// Semantic rejection reported by the backend, surfaced verbatim.
    #[error("{0}")]
    Domain(String),
}

impl ComputeError {
    /// Connectivity-class failures may be retried with the same answers.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ComputeError::Domain(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Unified error type for the quiz, its compute call and report output.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Compute(#[from] ComputeError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Report error: {0}")]
    Report(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Usage(String),
    #[error("Question catalogue is empty")]
    EmptyCatalogue,
    #[error("Duplicate or reserved question key `{0}`")]
    InvalidQuestionKey(String),
    #[error("All questions must be answered before submitting")]
    Incomplete,
    #[error("The calculation was rejected; restart the quiz to try again")]
    Halted,
    #[error("Results are already available; restart the quiz to calculate again")]
    AlreadyComplete,
}

pub type Result<T> = StdResult<T, QuizError>;
