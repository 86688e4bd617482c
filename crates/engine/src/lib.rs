//! # Engine Crate
//!
//! Content-based recommendation over a trained, immutable model.
//!
//! ## Components
//!
//! ### TrainedModel
//! One training run's output: cleaned catalog, similarity matrix, title/id
//! index, weighted-rating ordering. Built by `TrainedModel::train`.
//!
//! ### Ranking
//! - `get_recommendations`: nearest neighbours by cosine similarity
//! - `hybrid_recommendations`: similarity top-n re-ranked by
//!   `similarity * average_rating`
//! - `top_rated`: weighted-rating fallback list
//!
//! ### Seed selection
//! Maps an ordered rating history to a seed title and chooses between the
//! hybrid list and the fallback.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::JsonMovieStore;
//! use engine::TrainedModel;
//! use pipeline::TrainingConfig;
//!
//! let store = JsonMovieStore::new("data/movies.json");
//! let model = TrainedModel::train(&store, &TrainingConfig::default())?;
//! let recs = model.hybrid_recommendations("Jaws", 10, true);
//! ```

pub mod error;
pub mod model;
pub mod recommend;
pub mod seed;

pub use error::{Result, TrainError};
pub use model::TrainedModel;
pub use recommend::Recommendation;
pub use seed::{RecommendationSource, DEFAULT_LIMIT};

// Re-exported so callers only need this crate for configuration
pub use pipeline::{TrainingConfig, DEFAULT_PERCENTILE};
