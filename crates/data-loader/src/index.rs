//! Catalog lookup structures.
//!
//! Built once from the final cleaned catalog and read-only afterwards:
//! - title -> row (exact string match, last duplicate wins)
//! - external id -> title (for mapping rating history to titles)

use crate::types::{MovieId, MovieRecord, Row};
use std::collections::HashMap;

/// Immutable lookup tables over a cleaned catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    title_to_row: HashMap<String, Row>,
    id_to_title: HashMap<MovieId, String>,
}

impl CatalogIndex {
    /// Build both tables from catalog order.
    ///
    /// When two movies share a title the later row owns the title key;
    /// each id still maps to its own (shared) title string.
    pub fn build(movies: &[MovieRecord]) -> Self {
        let mut title_to_row = HashMap::with_capacity(movies.len());
        let mut id_to_title = HashMap::with_capacity(movies.len());

        for (row, movie) in movies.iter().enumerate() {
            title_to_row.insert(movie.title.clone(), row);
            id_to_title.insert(movie.id.clone(), movie.title.clone());
        }

        Self {
            title_to_row,
            id_to_title,
        }
    }

    /// Row of a title, exact match only
    pub fn row_for_title(&self, title: &str) -> Option<Row> {
        self.title_to_row.get(title).copied()
    }

    /// Title of an external id
    pub fn title_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_title.get(id).map(String::as_str)
    }

    /// Number of distinct titles
    pub fn title_count(&self) -> usize {
        self.title_to_row.len()
    }

    /// Number of distinct ids
    pub fn id_count(&self) -> usize {
        self.id_to_title.len()
    }
}
