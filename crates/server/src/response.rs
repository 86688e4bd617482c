//! JSON shapes returned by the HTTP API.
//!
//! Floats pass through `finite`, so NaN or infinite values leave the
//! service as `null`.

use crate::service::ServiceStatus;
use engine::Recommendation;
use serde::Serialize;
use serde_json::Value;

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// One movie in a recommendation response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub plot: Option<String>,
    pub fullplot: Option<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub runtime: Option<u32>,
    pub poster: Option<String>,
    pub awards: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: u64,
    pub tomato_rating: Option<f64>,
    pub tomato_count: Option<u64>,
    pub genres_str: String,
    pub cast_str: String,
    pub directors_clean: String,
    pub title_clean: String,
    pub weighted_rating: Option<f64>,
    pub soup: String,
    pub similarity_score: Option<f64>,
    pub hybrid_score: Option<f64>,
}

impl From<Recommendation> for MovieResponse {
    fn from(rec: Recommendation) -> Self {
        let movie = rec.movie;
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            genres: movie.genres,
            cast: movie.cast,
            directors: movie.directors,
            writers: movie.writers,
            plot: movie.plot,
            fullplot: movie.fullplot,
            languages: movie.languages,
            countries: movie.countries,
            runtime: movie.runtime,
            poster: movie.poster,
            awards: movie.awards,
            kind: movie.kind,
            imdb_rating: finite(movie.imdb_rating),
            imdb_votes: movie.imdb_votes,
            tomato_rating: movie.tomato_rating.and_then(finite),
            tomato_count: movie.tomato_count,
            genres_str: movie.genres_str,
            cast_str: movie.cast_str,
            directors_clean: movie.directors_clean,
            title_clean: movie.title_clean,
            weighted_rating: finite(movie.weighted_rating),
            soup: movie.soup,
            similarity_score: rec.similarity_score.and_then(finite),
            hybrid_score: rec.hybrid_score.and_then(finite),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    /// "healthy" unless training has failed with nothing to serve
    pub status: &'static str,
    pub recommender_initialized: bool,
    pub state: ServiceStatus,
}

impl HealthResponse {
    pub fn new(state: ServiceStatus, initialized: bool) -> Self {
        let status = if state == ServiceStatus::Failed {
            "unhealthy"
        } else {
            "healthy"
        };
        Self {
            status,
            recommender_initialized: initialized,
            state,
        }
    }
}
