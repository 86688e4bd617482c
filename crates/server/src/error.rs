//! Service-level errors and their HTTP mapping.

use crate::service::ServiceStatus;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// No trained model to serve from
    #[error("recommender not ready ({0})")]
    NotReady(ServiceStatus),

    /// A training run is already in flight
    #[error("training already in progress")]
    TrainingInProgress,

    #[error("training failed: {0}")]
    TrainingFailed(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::NotReady(_) | ServiceError::TrainingFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::TrainingInProgress => StatusCode::CONFLICT,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
