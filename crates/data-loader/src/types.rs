//! Core domain types for the movie catalog.
//!
//! Records arrive from the metadata store as loosely-typed documents
//! (`RawMovie`) and leave cleaning as a strongly-typed `MovieRecord`.
//! Every optional field and every coercion default is decided once, in
//! the cleaning stage, so downstream code never re-checks shapes.

use crate::parser::coerce_timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Type Aliases
// =============================================================================

/// External identifier of a movie (the store's document id, as a string)
pub type MovieId = String;

/// Position of a movie in the cleaned catalog (and in the similarity matrix)
pub type Row = usize;

// =============================================================================
// Raw documents from the metadata store
// =============================================================================

/// A movie document exactly as the metadata store hands it over.
///
/// Numeric fields are kept as `Value` because exports mix numbers,
/// numeric strings, and empty strings for the same key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMovie {
    /// Either a plain string or `{"$oid": "..."}`
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub cast: Option<Vec<String>>,
    #[serde(default)]
    pub directors: Option<Vec<String>>,
    #[serde(default)]
    pub writers: Option<Vec<String>>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub fullplot: Option<String>,
    #[serde(default)]
    pub imdb: Option<RawImdb>,
    #[serde(default)]
    pub tomatoes: Option<RawTomatoes>,
    #[serde(default)]
    pub awards: Option<Value>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub countries: Option<Vec<String>>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub runtime: Option<Value>,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Nested IMDb block of a raw document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImdb {
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub votes: Option<Value>,
}

/// Nested critic/viewer block of a raw document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTomatoes {
    #[serde(default)]
    pub viewer: Option<RawViewer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawViewer {
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(rename = "numReviews", default)]
    pub num_reviews: Option<Value>,
}

// =============================================================================
// Cleaned catalog record
// =============================================================================

/// A cleaned, validated movie.
///
/// Invariant: `title` is set, `imdb_votes > 0` and `genres_str` is not
/// blank. `weighted_rating` and `soup` are filled in by the training
/// pipeline before the catalog is frozen into a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub id: MovieId,
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

    /// IMDb rating, 0.0 when the source value could not be parsed
    pub imdb_rating: f64,
    /// IMDb vote count, 0 when the source value could not be parsed
    pub imdb_votes: u64,
    /// Viewer rating from the critic block, if present and numeric
    pub tomato_rating: Option<f64>,
    /// Viewer review count from the critic block, if present and numeric
    pub tomato_count: Option<u64>,

    /// Genres joined with ", "
    pub genres_str: String,
    /// First few cast members joined with ", "
    pub cast_str: String,
    /// Lower-cased, whitespace-free director names joined with ", "
    pub directors_clean: String,
    pub title_clean: String,

    pub weighted_rating: f64,
    pub soup: String,
}

impl MovieRecord {
    /// Rating used for quality scoring and hybrid re-ranking
    pub fn average_rating(&self) -> f64 {
        self.imdb_rating
    }

    /// Vote count used for quality scoring
    pub fn votes_count(&self) -> u64 {
        self.imdb_votes
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// One rating a user gave to a movie, as stored by the ratings provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub email: String,
    #[serde(rename = "movieId", alias = "movie_id")]
    pub movie_id: MovieId,
    pub rating: f64,
    /// Milliseconds since the Unix epoch. Exports may carry an epoch
    /// number, an ISO-8601 string or `{"$date": ...}`; anything
    /// unreadable sorts as oldest.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: i64,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_timestamp(&value).unwrap_or(0))
}

/// Order a rating history the way seed selection expects it:
/// rating descending, then most recent first.
pub fn order_for_seed(ratings: &mut [UserRating]) {
    ratings.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}
