//! The training pipeline turns raw documents into a ready feature set.
//!
//! ## Stages
//! 1. Clean raw documents into `MovieRecord`s (order preserved)
//! 2. Score every record with the weighted rating
//! 3. Build each record's soup
//! 4. Vectorize soups (uni+bigrams, English stop words, no df cut)
//! 5. Compute the pairwise cosine similarity matrix
//!
//! Each stage logs its input and output sizes. The whole run is CPU-bound
//! and synchronous; async callers should run it on a blocking thread.

use crate::config::TrainingConfig;
use crate::error::{PipelineError, Result};
use crate::scorer::{QualityStats, WeightedRatingScorer};
use crate::similarity::SimilarityMatrix;
use crate::soup::fill_soups;
use crate::vectorizer::CountVectorizer;
use data_loader::{clean_movies, MovieRecord, RawMovie};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Everything a trained recommender needs besides its lookup index.
#[derive(Debug, Clone)]
pub struct TrainedFeatures {
    /// Cleaned catalog; row `i` here is row `i` of `similarity`
    pub movies: Vec<MovieRecord>,
    pub stats: QualityStats,
    pub similarity: SimilarityMatrix,
    pub vocabulary_size: usize,
}

/// Runs the training stages with a fixed configuration.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: TrainingConfig,
    scorer: WeightedRatingScorer,
}

impl TrainingPipeline {
    /// Validate `config` and build the pipeline.
    ///
    /// # Errors
    /// `InvalidPercentile` or `InvalidNgramRange` for out-of-range settings
    pub fn new(config: TrainingConfig) -> Result<Self> {
        let scorer = WeightedRatingScorer::new(config.percentile)?;
        // Fail on a bad range here rather than halfway through a run
        Self::vectorizer(&config)?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn vectorizer(config: &TrainingConfig) -> Result<CountVectorizer> {
        let (min_n, max_n) = config.ngram_range;
        Ok(CountVectorizer::new()
            .with_ngram_range(min_n, max_n)?
            .with_stop_words_english())
    }

    /// Run every stage over `raw_movies`.
    ///
    /// # Errors
    /// `EmptyCorpus` when no record survives cleaning
    #[instrument(skip(self, raw_movies), fields(documents = raw_movies.len()))]
    pub fn run(&self, raw_movies: Vec<RawMovie>) -> Result<TrainedFeatures> {
        let start = Instant::now();

        let input = raw_movies.len();
        let mut movies = clean_movies(raw_movies, self.config.cast_limit);
        debug!("[clean] {} -> {} records", input, movies.len());
        if movies.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }

        let stats = self.scorer.apply(&mut movies)?;
        debug!(
            "[score] C={:.4} m={:.1}",
            stats.mean_rating, stats.vote_threshold
        );

        fill_soups(&mut movies);

        let mut vectorizer = Self::vectorizer(&self.config)?;
        let soups: Vec<&str> = movies.iter().map(|m| m.soup.as_str()).collect();
        let vectors = vectorizer.fit_transform(&soups);
        let vocabulary_size = vectorizer.vocabulary_size();
        debug!("[vectorize] {} soups, {} terms", vectors.len(), vocabulary_size);

        let similarity = SimilarityMatrix::build(&vectors);

        info!(
            "Training finished: {} movies, {} terms in {:?}",
            movies.len(),
            vocabulary_size,
            start.elapsed()
        );

        Ok(TrainedFeatures {
            movies,
            stats,
            similarity,
            vocabulary_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RawImdb;
    use serde_json::json;

    fn raw(title: &str, genres: &[&str], rating: f64, votes: u64) -> RawMovie {
        RawMovie {
            title: Some(json!(title)),
            genres: Some(genres.iter().map(|g| g.to_string()).collect()),
            cast: Some(vec!["Someone".to_string()]),
            imdb: Some(RawImdb {
                rating: Some(json!(rating)),
                votes: Some(json!(votes)),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_fills_all_features() {
        let pipeline = TrainingPipeline::new(TrainingConfig::default()).unwrap();
        let features = pipeline
            .run(vec![
                raw("Alien", &["Horror", "Sci-Fi"], 8.5, 700),
                raw("Aliens", &["Action", "Sci-Fi"], 8.4, 600),
                raw("Annie Hall", &["Comedy", "Romance"], 8.0, 250),
            ])
            .unwrap();

        assert_eq!(features.movies.len(), 3);
        assert_eq!(features.similarity.len(), 3);
        assert!(features.vocabulary_size > 0);
        assert!(features.movies.iter().all(|m| !m.soup.is_empty()));
        assert!(features.movies.iter().all(|m| m.weighted_rating > 0.0));

        let sci_fi = features.similarity.get(0, 1).unwrap();
        let unrelated = features.similarity.get(0, 2).unwrap();
        assert!(sci_fi > unrelated);
    }

    #[test]
    fn test_empty_after_cleaning() {
        let pipeline = TrainingPipeline::new(TrainingConfig::default()).unwrap();
        let err = pipeline.run(vec![raw("Nobody Saw It", &["Drama"], 6.0, 0)]).unwrap_err();
        assert_eq!(err, PipelineError::EmptyCorpus);
    }

    #[test]
    fn test_rejects_bad_config() {
        let bad_percentile = TrainingConfig::default().with_percentile(2.0);
        assert!(TrainingPipeline::new(bad_percentile).is_err());

        let bad_range = TrainingConfig::default().with_ngram_range(2, 1);
        assert_eq!(
            TrainingPipeline::new(bad_range).unwrap_err(),
            PipelineError::InvalidNgramRange(2, 1)
        );
    }
}
