//! Server crate for the ReelRecs recommendation service.
//!
//! This crate contains the service facade that owns the training
//! lifecycle, and the axum router that exposes it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod response;
pub mod service;

pub use api::{build_router, AppState};
pub use config::{ServerArgs, ServiceConfig};
pub use error::ServiceError;
pub use response::{HealthResponse, MovieResponse};
pub use service::{RecommenderService, ServiceStatus, TrainingTicket};
