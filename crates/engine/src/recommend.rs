//! Content-based ranking over a trained model.
//!
//! ## Algorithm
//! `get_recommendations`:
//! 1. Resolve the seed title to a row (exact match)
//! 2. Read the seed's similarity row
//! 3. Stable-sort every other row by similarity descending
//! 4. Optionally put the seed itself in front
//! 5. Keep the first `n`
//!
//! `hybrid_recommendations` takes that top-`n` set and re-ranks only those
//! rows by `similarity * average_rating`. Rows outside the similarity
//! top-`n` are never considered.

use crate::model::TrainedModel;
use data_loader::{MovieRecord, Row};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// A movie in a result list with the scores that placed it there.
///
/// Both scores are `None` on the weighted-rating fallback path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: MovieRecord,
    pub similarity_score: Option<f64>,
    pub hybrid_score: Option<f64>,
}

impl Recommendation {
    fn new(movie: &MovieRecord) -> Self {
        Self {
            movie: movie.clone(),
            similarity_score: None,
            hybrid_score: None,
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl TrainedModel {
    /// Row of an exact title. A miss is reported as `None`; no other
    /// movie is ever substituted.
    pub fn resolve_index(&self, title: &str) -> Option<Row> {
        let row = self.index.row_for_title(title);
        if row.is_none() {
            debug!("Title not found: {:?}", title);
        }
        row
    }

    /// `(row, similarity)` pairs for the `n` nearest neighbours of `seed`.
    ///
    /// With `exclude_self`, every row carrying the seed's title is dropped,
    /// not just the seed row, so duplicate titles never echo the query.
    fn similarity_ranking(&self, seed: Row, n: usize, exclude_self: bool) -> Vec<(Row, f64)> {
        let Some(scores) = self.similarity.row(seed) else {
            return Vec::new();
        };
        let seed_title = self.movies[seed].title.as_str();

        let mut ranked: Vec<(Row, f64)> = scores
            .iter()
            .enumerate()
            .filter(|&(row, _)| row != seed)
            .filter(|&(row, _)| !exclude_self || self.movies[row].title != seed_title)
            .map(|(row, &score)| (row, score))
            .collect();
        ranked.sort_by(|a, b| descending(a.1, b.1));

        if !exclude_self {
            ranked.insert(0, (seed, scores[seed]));
        }
        ranked.truncate(n);
        ranked
    }

    /// Up to `n` movies most similar to `title`.
    ///
    /// # Arguments
    /// * `title` - Exact catalog title of the seed movie
    /// * `n` - Maximum number of results
    /// * `exclude_self` - Drop the seed, and any other record with the same
    ///   title, from the results; when false the seed is always the first entry
    ///
    /// # Returns
    /// An empty list when the title is unknown or `n` is zero
    #[instrument(skip(self))]
    pub fn get_recommendations(&self, title: &str, n: usize, exclude_self: bool) -> Vec<Recommendation> {
        if n == 0 {
            return Vec::new();
        }
        let Some(seed) = self.resolve_index(title) else {
            return Vec::new();
        };

        let results: Vec<Recommendation> = self
            .similarity_ranking(seed, n, exclude_self)
            .into_iter()
            .map(|(row, score)| Recommendation {
                similarity_score: Some(score),
                ..Recommendation::new(&self.movies[row])
            })
            .collect();

        debug!("{} similarity recommendations for {:?}", results.len(), title);
        results
    }

    /// The similarity top-`n` for `title`, re-ranked by
    /// `similarity * average_rating` descending.
    #[instrument(skip(self))]
    pub fn hybrid_recommendations(&self, title: &str, n: usize, exclude_self: bool) -> Vec<Recommendation> {
        let mut results = self.get_recommendations(title, n, exclude_self);
        for rec in &mut results {
            rec.hybrid_score = rec
                .similarity_score
                .map(|similarity| similarity * rec.movie.average_rating());
        }
        results.sort_by(|a, b| {
            descending(
                a.hybrid_score.unwrap_or(f64::MIN),
                b.hybrid_score.unwrap_or(f64::MIN),
            )
        });
        results
    }

    /// Top `n` movies by weighted rating, without scores.
    pub fn top_rated(&self, n: usize) -> Vec<Recommendation> {
        self.by_quality
            .iter()
            .take(n)
            .map(|&row| Recommendation::new(&self.movies[row]))
            .collect()
    }
}
