//! # Recommender Service
//!
//! Owns the training lifecycle and serves requests from the current
//! model snapshot.
//!
//! ## State machine
//! ```text
//! Uninitialized --train--> Training --ok--> Ready
//!                              \--err--> Failed
//! Ready --retrain--> Training{current} --ok--> Ready(new)
//!                                 \--err--> Ready(current)
//! ```
//!
//! A retrain builds the new model on a blocking thread while requests
//! keep reading the current snapshot; the swap is a single write under
//! the state lock, so readers see either the old model or the new one.
//!
//! ## Request path
//! 1. Clone the current snapshot `Arc` (fails with `NotReady` if none)
//! 2. Fetch the user's ratings under a timeout; failure means no ratings
//! 3. Seed from the history, or fall back to the weighted-rating list

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use data_loader::{MovieProvider, ProviderError, RatingsProvider, UserRating};
use engine::{Recommendation, RecommendationSource, TrainedModel, TrainingConfig};

/// Coarse lifecycle state, as reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Uninitialized,
    Training,
    Ready,
    Failed,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceStatus::Uninitialized => "uninitialized",
            ServiceStatus::Training => "training",
            ServiceStatus::Ready => "ready",
            ServiceStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
enum ServiceState {
    Uninitialized,
    /// `current` keeps serving while a retrain runs
    Training { current: Option<Arc<TrainedModel>> },
    Ready(Arc<TrainedModel>),
    Failed(String),
}

impl ServiceState {
    fn model(&self) -> Option<&Arc<TrainedModel>> {
        match self {
            ServiceState::Ready(model) => Some(model),
            ServiceState::Training { current } => current.as_ref(),
            ServiceState::Uninitialized | ServiceState::Failed(_) => None,
        }
    }

    fn status(&self) -> ServiceStatus {
        match self {
            ServiceState::Uninitialized => ServiceStatus::Uninitialized,
            ServiceState::Training { .. } => ServiceStatus::Training,
            ServiceState::Ready(_) => ServiceStatus::Ready,
            ServiceState::Failed(_) => ServiceStatus::Failed,
        }
    }
}

/// Handle to an accepted training run; pass it to `RecommenderService::run_training`
#[derive(Debug)]
pub struct TrainingTicket {
    previous: Option<Arc<TrainedModel>>,
}

pub struct RecommenderService {
    movies: Arc<dyn MovieProvider>,
    ratings: Arc<dyn RatingsProvider>,
    training: TrainingConfig,
    config: ServiceConfig,
    state: RwLock<ServiceState>,
}

impl RecommenderService {
    /// Create an untrained service
    ///
    /// # Arguments
    /// * `movies` - Metadata store the model is trained from
    /// * `ratings` - Per-user rating history for seed selection
    /// * `training` - Pipeline settings for every training run
    /// * `config` - Request defaults and the ratings timeout
    pub fn new(
        movies: Arc<dyn MovieProvider>,
        ratings: Arc<dyn RatingsProvider>,
        training: TrainingConfig,
        config: ServiceConfig,
    ) -> Self {
        Self {
            movies,
            ratings,
            training,
            config,
            state: RwLock::new(ServiceState::Uninitialized),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn status(&self) -> ServiceStatus {
        self.state.read().await.status()
    }

    /// Whether requests can be served right now
    pub async fn is_ready(&self) -> bool {
        self.state.read().await.model().is_some()
    }

    /// Error message of the last failed initial training, if any
    pub async fn last_failure(&self) -> Option<String> {
        match &*self.state.read().await {
            ServiceState::Failed(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Result<Arc<TrainedModel>> {
        let state = self.state.read().await;
        state
            .model()
            .cloned()
            .ok_or(ServiceError::NotReady(state.status()))
    }

    /// Train (or retrain) and wait for the result.
    pub async fn train(&self) -> Result<Arc<TrainedModel>> {
        let ticket = self.begin_training().await?;
        self.run_training(ticket).await
    }

    /// Move into `Training`, refusing if a run is already in flight.
    pub async fn begin_training(&self) -> Result<TrainingTicket> {
        let mut state = self.state.write().await;
        if let ServiceState::Training { .. } = *state {
            return Err(ServiceError::TrainingInProgress);
        }
        let previous = state.model().cloned();
        *state = ServiceState::Training {
            current: previous.clone(),
        };
        Ok(TrainingTicket { previous })
    }

    /// Build a model off the async runtime and swap it in.
    ///
    /// On failure a previous model, if any, stays in service.
    #[instrument(skip(self, ticket), fields(provider = self.movies.name()))]
    pub async fn run_training(&self, ticket: TrainingTicket) -> Result<Arc<TrainedModel>> {
        let start = Instant::now();
        info!("Training started");

        let provider = Arc::clone(&self.movies);
        let config = self.training.clone();
        let outcome =
            tokio::task::spawn_blocking(move || TrainedModel::train(provider.as_ref(), &config))
                .await;

        let result = match outcome {
            Ok(Ok(model)) => Ok(Arc::new(model)),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("training task panicked: {e}")),
        };

        let mut state = self.state.write().await;
        match result {
            Ok(model) => {
                info!(
                    "Training finished: {} movies in {:.2?}",
                    model.movie_count(),
                    start.elapsed()
                );
                *state = ServiceState::Ready(Arc::clone(&model));
                Ok(model)
            }
            Err(reason) => {
                match ticket.previous {
                    Some(previous) => {
                        error!("Retrain failed, keeping previous model: {}", reason);
                        *state = ServiceState::Ready(previous);
                    }
                    None => {
                        error!("Training failed: {}", reason);
                        *state = ServiceState::Failed(reason.clone());
                    }
                }
                Err(ServiceError::TrainingFailed(reason))
            }
        }
    }

    /// Ratings for `user`, or an empty history on error or timeout
    async fn fetch_ratings(&self, user: &str) -> Vec<UserRating> {
        let timeout = self.config.ratings_timeout;
        let result = match tokio::time::timeout(timeout, self.ratings.ratings_for(user)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        };

        match result {
            Ok(ratings) => ratings,
            Err(e) => {
                warn!("Ratings lookup for {} failed, treating as no ratings: {}", user, e);
                Vec::new()
            }
        }
    }

    /// Up to `n` recommendations for `user`.
    ///
    /// # Returns
    /// The hybrid list for the user's seed movie, or the weighted-rating
    /// top list when no seed resolves
    ///
    /// # Errors
    /// `NotReady` when no model has been trained yet or training failed
    #[instrument(skip(self))]
    pub async fn recommend(&self, user: &str, n: usize) -> Result<Vec<Recommendation>> {
        let start = Instant::now();
        let model = self.snapshot().await?;
        let ratings = self.fetch_ratings(user).await;

        let (source, recommendations) = model.recommend_from_history(&ratings, n);
        match &source {
            RecommendationSource::Seeded(seed) => {
                debug!("Seed for {}: {:?}", user, seed)
            }
            RecommendationSource::Fallback => {
                info!("No usable ratings for {}, returning top movies", user)
            }
        }

        debug!(
            "{} recommendations for {} in {:.2?}",
            recommendations.len(),
            user,
            start.elapsed()
        );
        Ok(recommendations)
    }
}
