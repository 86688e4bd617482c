//! # Data Loader Crate
//!
//! Ingestion side of the recommender: reading movie documents from the
//! metadata store, cleaning them into typed records, and indexing the
//! cleaned catalog.
//!
//! ## Main Components
//!
//! - **types**: Raw and cleaned movie shapes, user ratings
//! - **parser**: JSON / JSON-lines exports and lenient value coercion
//! - **clean**: Ingestion contract filter and record normalization
//! - **index**: Title and id lookups over the cleaned catalog
//! - **provider**: Metadata and ratings provider traits plus file stores
//! - **error**: Error types for loading and provider calls
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{clean_movies, CatalogIndex, JsonMovieStore, MovieProvider};
//!
//! let store = JsonMovieStore::new("data/movies.json");
//! let movies = clean_movies(store.fetch_movies()?, 5);
//! let index = CatalogIndex::build(&movies);
//!
//! assert_eq!(index.row_for_title("Jaws"), Some(0));
//! ```

pub mod clean;
pub mod error;
pub mod index;
pub mod parser;
pub mod provider;
pub mod types;

pub use clean::{clean_movies, meets_ingestion_contract, DEFAULT_CAST_LIMIT};
pub use error::{DataLoadError, ProviderError, Result};
pub use index::CatalogIndex;
pub use provider::{
    InMemoryMovieStore, JsonMovieStore, JsonRatingsStore, MovieProvider, RatingsProvider,
    RatingsStore,
};
pub use types::{
    order_for_seed, MovieId, MovieRecord, RawImdb, RawMovie, RawTomatoes, RawViewer, Row,
    UserRating,
};
