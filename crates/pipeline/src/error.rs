//! Error types for the training pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Scoring or vectorizing needs at least one record
    #[error("cannot train on an empty corpus")]
    EmptyCorpus,

    /// Vote-count percentile must lie in [0, 1]
    #[error("percentile must be within [0, 1], got {0}")]
    InvalidPercentile(f64),

    /// N-gram bounds must satisfy 1 <= min <= max
    #[error("invalid n-gram range ({0}, {1})")]
    InvalidNgramRange(usize, usize),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
