//! Tunables for one training pass.

use data_loader::DEFAULT_CAST_LIMIT;

/// Default vote-count percentile used as the shrinkage threshold `m`
pub const DEFAULT_PERCENTILE: f64 = 0.95;

/// Parameters for cleaning, scoring, and vectorizing a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Percentile of vote counts used as `m` in the weighted rating
    pub percentile: f64,
    /// Leading cast members kept in `cast_str`
    pub cast_limit: usize,
    /// Inclusive n-gram range of the vectorizer
    pub ngram_range: (usize, usize),
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PERCENTILE,
            cast_limit: DEFAULT_CAST_LIMIT,
            ngram_range: (1, 2),
        }
    }
}

impl TrainingConfig {
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }
}
