//! Metadata and ratings providers.
//!
//! The recommender treats both stores as black boxes behind these traits:
//! - `MovieProvider` returns raw documents already filtered to the
//!   ingestion contract. It is blocking; training runs off the async runtime.
//! - `RatingsProvider` returns one user's history ordered rating desc,
//!   timestamp desc. It is async because it sits on the request path.
//!
//! The file-backed stores read JSON exports of the movie and ratings
//! collections. `JsonRatingsStore` re-reads its export whenever the file
//! changes, so ratings written after startup can seed recommendations.

use crate::clean::meets_ingestion_contract;
use crate::error::{ProviderError, Result};
use crate::parser;
use crate::types::{order_for_seed, RawMovie, UserRating};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Source of raw movie documents for training.
pub trait MovieProvider: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Fetch every document that meets the ingestion contract
    fn fetch_movies(&self) -> std::result::Result<Vec<RawMovie>, ProviderError>;
}

/// Source of per-user rating history.
#[async_trait]
pub trait RatingsProvider: Send + Sync {
    /// Ratings of `user`, ordered rating desc then timestamp desc.
    /// An unknown user yields an empty history, not an error.
    async fn ratings_for(&self, user: &str) -> std::result::Result<Vec<UserRating>, ProviderError>;
}

// =============================================================================
// Movie stores
// =============================================================================

/// Movie export on disk (JSON array or JSON lines), filtered client-side.
#[derive(Debug, Clone)]
pub struct JsonMovieStore {
    path: PathBuf,
    name: String,
}

impl JsonMovieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("json:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MovieProvider for JsonMovieStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_movies(&self) -> std::result::Result<Vec<RawMovie>, ProviderError> {
        let docs = parser::parse_movies(&self.path)?;
        let total = docs.len();
        let kept: Vec<RawMovie> = docs.into_iter().filter(meets_ingestion_contract).collect();
        info!(
            "Fetched {} documents from {} ({} met the ingestion contract)",
            total,
            self.path.display(),
            kept.len()
        );
        Ok(kept)
    }
}

/// Movies held in memory; applies the same contract filter as the file store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Vec<RawMovie>,
}

impl InMemoryMovieStore {
    pub fn new(movies: Vec<RawMovie>) -> Self {
        Self { movies }
    }
}

impl MovieProvider for InMemoryMovieStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_movies(&self) -> std::result::Result<Vec<RawMovie>, ProviderError> {
        Ok(self
            .movies
            .iter()
            .filter(|m| meets_ingestion_contract(m))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Ratings store
// =============================================================================

/// Rating histories grouped by user, each pre-ordered for seed selection.
#[derive(Debug, Clone, Default)]
pub struct RatingsStore {
    by_user: HashMap<String, Vec<UserRating>>,
}

impl RatingsStore {
    /// Group and order a flat list of ratings
    pub fn from_ratings(ratings: Vec<UserRating>) -> Self {
        let mut by_user: HashMap<String, Vec<UserRating>> = HashMap::new();
        for rating in ratings {
            by_user
                .entry(rating.email.clone())
                .or_insert_with(Vec::new)
                .push(rating);
        }
        for history in by_user.values_mut() {
            order_for_seed(history);
        }
        Self { by_user }
    }

    /// Load a ratings export from disk
    pub fn load(path: &Path) -> Result<Self> {
        let ratings = parser::parse_ratings(path)?;
        let store = Self::from_ratings(ratings);
        info!(
            "Loaded ratings for {} users from {}",
            store.user_count(),
            path.display()
        );
        Ok(store)
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// All known user identifiers, sorted
    pub fn users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.by_user.keys().map(String::as_str).collect();
        users.sort_unstable();
        users
    }

    pub fn history(&self, user: &str) -> &[UserRating] {
        self.by_user.get(user).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[async_trait]
impl RatingsProvider for RatingsStore {
    async fn ratings_for(&self, user: &str) -> std::result::Result<Vec<UserRating>, ProviderError> {
        let history = self.history(user).to_vec();
        debug!("Found {} ratings for {}", history.len(), user);
        Ok(history)
    }
}

// =============================================================================
// Live ratings export
// =============================================================================

/// Modification time and size of the export, used to detect changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn read(path: &Path) -> std::result::Result<Self, ProviderError> {
        let meta = fs::metadata(path).map_err(|e| {
            ProviderError::Unavailable(format!("cannot stat {}: {}", path.display(), e))
        })?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct CachedRatings {
    stamp: FileStamp,
    store: Arc<RatingsStore>,
}

/// Ratings export on disk, reloaded whenever the file changes.
///
/// Each lookup stats the file off the async runtime and re-parses it only
/// when its modification time or size moved. A reload that fails keeps
/// serving the last good snapshot.
#[derive(Debug, Clone)]
pub struct JsonRatingsStore {
    path: PathBuf,
    cache: Arc<Mutex<Option<CachedRatings>>>,
}

impl JsonRatingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current ratings, reloading the export if it changed. Blocking.
    pub fn snapshot(&self) -> std::result::Result<Arc<RatingsStore>, ProviderError> {
        let stamp = FileStamp::read(&self.path)?;
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| ProviderError::Unavailable("ratings cache lock poisoned".to_string()))?;

        if let Some(cached) = cache.as_ref() {
            if cached.stamp == stamp {
                return Ok(Arc::clone(&cached.store));
            }
        }

        match RatingsStore::load(&self.path) {
            Ok(store) => {
                let store = Arc::new(store);
                *cache = Some(CachedRatings {
                    stamp,
                    store: Arc::clone(&store),
                });
                Ok(store)
            }
            Err(e) => match cache.as_ref() {
                Some(cached) => {
                    warn!("Keeping previous ratings; reload of {} failed: {}", self.path.display(), e);
                    Ok(Arc::clone(&cached.store))
                }
                None => Err(e.into()),
            },
        }
    }
}

#[async_trait]
impl RatingsProvider for JsonRatingsStore {
    async fn ratings_for(&self, user: &str) -> std::result::Result<Vec<UserRating>, ProviderError> {
        let store = self.clone();
        let user = user.to_string();
        tokio::task::spawn_blocking(move || {
            store
                .snapshot()
                .map(|ratings| ratings.history(&user).to_vec())
        })
        .await
        .map_err(|e| ProviderError::Unavailable(format!("ratings reload task failed: {e}")))?
    }
}
