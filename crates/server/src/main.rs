//! ReelRecs HTTP server.
//!
//! Trains once at startup, then serves recommendations. A failed initial
//! training leaves the server up with `/health` reporting the failure.
//! The ratings export is re-read whenever it changes on disk.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use data_loader::{JsonMovieStore, JsonRatingsStore, RatingsProvider, RatingsStore};
use server::{build_router, AppState, RecommenderService, ServerArgs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ServerArgs::parse();
    info!("Starting ReelRecs server with {:?}", args);

    let movies = Arc::new(JsonMovieStore::new(&args.movies_path));
    let ratings: Arc<dyn RatingsProvider> = match &args.ratings_path {
        Some(path) => {
            let store = JsonRatingsStore::new(path);
            // A bad export is not fatal: lookups fall back to an empty history
            match store.snapshot() {
                Ok(ratings) => info!("Serving ratings for {} users from {}", ratings.user_count(), path.display()),
                Err(e) => warn!("Ratings unavailable at startup ({}); users get top-rated until it loads", e),
            }
            Arc::new(store)
        }
        None => {
            warn!("No ratings export configured; every user gets the top-rated list");
            Arc::new(RatingsStore::default())
        }
    };

    let service = Arc::new(RecommenderService::new(
        movies,
        ratings,
        args.training_config(),
        args.service_config(),
    ));

    if let Err(e) = service.train().await {
        error!("Recommender not initialized: {}", e);
    }

    let app = build_router(AppState::new(service));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!("Listening on http://{}", args.bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
