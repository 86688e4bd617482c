//! Training pipeline for the content-based recommender.
//!
//! This crate provides:
//! - `WeightedRatingScorer` for the Bayesian quality score
//! - `build_soup` / `CountVectorizer` for the text features
//! - `SimilarityMatrix` for pairwise cosine similarity
//! - `TrainingPipeline` chaining the above over a raw catalog
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{TrainingConfig, TrainingPipeline};
//!
//! let pipeline = TrainingPipeline::new(TrainingConfig::default())?;
//! let features = pipeline.run(raw_movies)?;
//! let row = features.similarity.row(0);
//! ```

pub mod config;
pub mod error;
pub mod scorer;
pub mod similarity;
pub mod soup;
pub mod stopwords;
pub mod training;
pub mod vectorizer;

pub use config::{TrainingConfig, DEFAULT_PERCENTILE};
pub use error::{PipelineError, Result};
pub use scorer::{quantile, weighted_rating, QualityStats, WeightedRatingScorer};
pub use similarity::SimilarityMatrix;
pub use soup::{build_soup, fill_soups};
pub use stopwords::{english_stop_words, ENGLISH_STOP_WORDS};
pub use training::{TrainedFeatures, TrainingPipeline};
pub use vectorizer::{CountVectorizer, SparseVector};
