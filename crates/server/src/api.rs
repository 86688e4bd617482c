//! HTTP surface.
//!
//! - `GET /recommend/:user?n=` recommendations for a user
//! - `GET /health` liveness plus whether a model is loaded
//! - `POST /retrain` start a background retrain (202, or 409 if one is running)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::response::{HealthResponse, MovieResponse};
use crate::service::RecommenderService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommenderService>,
}

impl AppState {
    pub fn new(service: Arc<RecommenderService>) -> Self {
        Self { service }
    }
}

/// `n` is signed so that `n <= 0` is an empty result, not a rejected query
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub n: Option<i64>,
}

impl RecommendQuery {
    fn limit(&self, default_limit: usize) -> usize {
        match self.n {
            Some(n) => usize::try_from(n.max(0)).unwrap_or(usize::MAX),
            None => default_limit,
        }
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/recommend/:user", get(recommend))
        .route("/health", get(health))
        .route("/retrain", post(retrain))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn recommend(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<Vec<MovieResponse>>> {
    let n = query.limit(state.service.config().default_limit);
    let recommendations = state.service.recommend(&user, n).await?;
    Ok(Json(
        recommendations.into_iter().map(MovieResponse::from).collect(),
    ))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.service.status().await;
    let initialized = state.service.is_ready().await;
    Json(HealthResponse::new(status, initialized))
}

async fn retrain(State(state): State<AppState>) -> Result<(StatusCode, Json<Value>)> {
    let ticket = state.service.begin_training().await?;
    info!("Retrain requested");

    let service = Arc::clone(&state.service);
    tokio::spawn(async move {
        // Outcome is logged by the service; the old model stays on failure
        let _ = service.run_training(ticket).await;
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "training" }))))
}
