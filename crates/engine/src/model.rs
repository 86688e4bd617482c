//! Trained model snapshot.
//!
//! A `TrainedModel` is produced by exactly one `train` call and is never
//! mutated afterwards. It owns the cleaned catalog, the similarity matrix
//! whose rows line up with the catalog, the lookup index, and a cached
//! weighted-rating ordering used for the fallback list.
//!
//! Share it behind an `Arc`; every read is lock-free.

use crate::error::{Result, TrainError};
use data_loader::{CatalogIndex, MovieProvider, MovieRecord, RawMovie, Row};
use pipeline::{PipelineError, QualityStats, SimilarityMatrix, TrainingConfig, TrainingPipeline};
use std::cmp::Ordering;
use std::time::{Instant, SystemTime};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) similarity: SimilarityMatrix,
    pub(crate) index: CatalogIndex,
    /// Rows ordered by weighted rating descending, ties in catalog order
    pub(crate) by_quality: Vec<Row>,
    stats: QualityStats,
    vocabulary_size: usize,
    trained_at: SystemTime,
}

impl TrainedModel {
    /// Fetch from `provider` and train.
    ///
    /// # Errors
    /// - `Provider` when the metadata store cannot be read
    /// - `EmptyCatalog` when nothing survives the contract and cleaning
    #[instrument(skip(provider, config), fields(provider = provider.name()))]
    pub fn train(provider: &dyn MovieProvider, config: &TrainingConfig) -> Result<Self> {
        let start = Instant::now();
        let raw = provider.fetch_movies()?;
        info!("Fetched {} movies in {:?}", raw.len(), start.elapsed());
        Self::from_raw(raw, config, provider.name())
    }

    /// Train from documents already in memory.
    pub fn from_raw(raw: Vec<RawMovie>, config: &TrainingConfig, source_name: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(TrainError::EmptyCatalog {
                source_name: source_name.to_string(),
            });
        }

        let pipeline = TrainingPipeline::new(config.clone()).map_err(TrainError::Pipeline)?;
        let features = pipeline.run(raw).map_err(|e| match e {
            PipelineError::EmptyCorpus => TrainError::EmptyCatalog {
                source_name: source_name.to_string(),
            },
            other => TrainError::Pipeline(other),
        })?;

        let index = CatalogIndex::build(&features.movies);
        let by_quality = quality_order(&features.movies);

        info!(
            "Model ready: {} movies, {} titles, {} ids",
            features.movies.len(),
            index.title_count(),
            index.id_count()
        );

        Ok(Self {
            movies: features.movies,
            similarity: features.similarity,
            index,
            by_quality,
            stats: features.stats,
            vocabulary_size: features.vocabulary_size,
            trained_at: SystemTime::now(),
        })
    }

    /// Cleaned catalog in row order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn movie(&self, row: Row) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn stats(&self) -> QualityStats {
        self.stats
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    pub fn trained_at(&self) -> SystemTime {
        self.trained_at
    }

    /// Title of an external movie id
    pub fn title_for_id(&self, id: &str) -> Option<&str> {
        self.index.title_for_id(id)
    }

    /// Case-insensitive substring match over titles, in catalog order.
    ///
    /// Browsing aid only; recommendation lookups stay exact-match.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&MovieRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }
}

fn quality_order(movies: &[MovieRecord]) -> Vec<Row> {
    let mut rows: Vec<Row> = (0..movies.len()).collect();
    // Stable: equal scores keep catalog order
    rows.sort_by(|&a, &b| {
        movies[b]
            .weighted_rating
            .partial_cmp(&movies[a].weighted_rating)
            .unwrap_or(Ordering::Equal)
    });
    rows
}
