//! Bayesian weighted rating.
//!
//! ## Algorithm
//! For a movie with rating `R` and `v` votes:
//!
//! ```text
//! weighted = (R * v + C * m) / (v + m)
//! ```
//!
//! where `C` is the mean rating over the corpus and `m` is the
//! `percentile` quantile of the vote counts (linear interpolation between
//! closest ranks). Movies with few votes are pulled toward `C`; movies
//! with many votes keep roughly their own rating.

use crate::error::{PipelineError, Result};
use data_loader::MovieRecord;
use rayon::prelude::*;
use tracing::debug;

/// Corpus statistics the weighted rating is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityStats {
    /// `C`: mean rating over the corpus
    pub mean_rating: f64,
    /// `m`: vote-count threshold at the configured percentile
    pub vote_threshold: f64,
}

/// Scores movies with the weighted rating formula.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRatingScorer {
    percentile: f64,
}

impl WeightedRatingScorer {
    /// # Errors
    /// `InvalidPercentile` unless `percentile` is finite and within [0, 1]
    pub fn new(percentile: f64) -> Result<Self> {
        if !percentile.is_finite() || !(0.0..=1.0).contains(&percentile) {
            return Err(PipelineError::InvalidPercentile(percentile));
        }
        Ok(Self { percentile })
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Compute `C` and `m` for a corpus.
    pub fn stats(&self, movies: &[MovieRecord]) -> Result<QualityStats> {
        if movies.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }

        let mean_rating =
            movies.iter().map(MovieRecord::average_rating).sum::<f64>() / movies.len() as f64;
        let mut votes: Vec<f64> = movies.iter().map(|m| m.votes_count() as f64).collect();
        let vote_threshold = quantile(&mut votes, self.percentile);

        Ok(QualityStats {
            mean_rating,
            vote_threshold,
        })
    }

    /// Fill `weighted_rating` on every movie and return the stats used.
    pub fn apply(&self, movies: &mut [MovieRecord]) -> Result<QualityStats> {
        let stats = self.stats(movies)?;
        movies.par_iter_mut().for_each(|movie| {
            movie.weighted_rating = weighted_rating(
                movie.average_rating(),
                movie.votes_count() as f64,
                &stats,
            );
        });

        debug!(
            "Weighted ratings computed: C={:.4}, m={:.1}, movies={}",
            stats.mean_rating,
            stats.vote_threshold,
            movies.len()
        );
        Ok(stats)
    }
}

/// `(R * v + C * m) / (v + m)`
///
/// With no votes and a zero threshold there is nothing to shrink toward,
/// so the corpus mean is returned.
pub fn weighted_rating(rating: f64, votes: f64, stats: &QualityStats) -> f64 {
    let denominator = votes + stats.vote_threshold;
    if denominator <= 0.0 {
        return stats.mean_rating;
    }
    (rating * votes + stats.mean_rating * stats.vote_threshold) / denominator
}

/// Quantile with linear interpolation between closest ranks.
///
/// Sorts `values` in place. Returns 0.0 for an empty slice.
pub fn quantile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = (values.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    values[lower] + (values[upper] - values[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_quantile_interpolates() {
        let mut values = vec![5.0, 800.0, 1000.0];
        // position = 2 * 0.95 = 1.9 -> 800 + 0.9 * 200
        assert!((quantile(&mut values, 0.95) - 980.0).abs() < EPS);

        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert!((quantile(&mut values, 0.5) - 2.5).abs() < EPS);
        assert_eq!(quantile(&mut values, 0.0), 1.0);
        assert_eq!(quantile(&mut values, 1.0), 4.0);
    }

    #[test]
    fn test_quantile_single_value() {
        assert_eq!(quantile(&mut [42.0], 0.95), 42.0);
        assert_eq!(quantile(&mut [], 0.95), 0.0);
    }

    #[test]
    fn test_invalid_percentile() {
        assert!(WeightedRatingScorer::new(1.5).is_err());
        assert!(WeightedRatingScorer::new(-0.1).is_err());
        assert!(WeightedRatingScorer::new(f64::NAN).is_err());
        assert!(WeightedRatingScorer::new(0.0).is_ok());
        assert!(WeightedRatingScorer::new(1.0).is_ok());
    }

    #[test]
    fn test_weighted_rating_formula() {
        let stats = QualityStats {
            mean_rating: 7.0,
            vote_threshold: 100.0,
        };
        // (9 * 100 + 7 * 100) / 200
        assert!((weighted_rating(9.0, 100.0, &stats) - 8.0).abs() < EPS);
        // no votes -> corpus mean
        assert!((weighted_rating(9.0, 0.0, &stats) - 7.0).abs() < EPS);
    }

    #[test]
    fn test_weighted_rating_degenerate_threshold() {
        let stats = QualityStats {
            mean_rating: 6.5,
            vote_threshold: 0.0,
        };
        assert_eq!(weighted_rating(9.0, 0.0, &stats), 6.5);
        assert_eq!(weighted_rating(9.0, 10.0, &stats), 9.0);
    }

    #[test]
    fn test_monotone_in_rating_and_votes() {
        let stats = QualityStats {
            mean_rating: 6.0,
            vote_threshold: 500.0,
        };

        let mut previous = f64::MIN;
        for rating in [1.0, 3.0, 5.0, 7.0, 9.0] {
            let score = weighted_rating(rating, 250.0, &stats);
            assert!(score >= previous);
            previous = score;
        }

        // Above the mean, more votes never lower the score
        let mut previous = f64::MIN;
        for votes in [0.0, 10.0, 100.0, 1_000.0, 100_000.0] {
            let score = weighted_rating(8.0, votes, &stats);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let scorer = WeightedRatingScorer::new(0.95).unwrap();
        let stats = scorer.stats(&[]);
        assert_eq!(stats, Err(PipelineError::EmptyCorpus));
    }
}
