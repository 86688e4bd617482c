//! Ingestion contract and cleaning.
//!
//! `meets_ingestion_contract` is the filter the metadata store applies
//! (server-side when it can, client-side otherwise). `clean_movies` then
//! flattens, coerces, and normalizes the survivors into `MovieRecord`s,
//! preserving input order.

use crate::parser::{coerce_count, coerce_f64, coerce_id, coerce_year, is_blank, stringify};
use crate::types::{MovieRecord, RawMovie};
use tracing::debug;

/// Default number of leading cast members kept in `cast_str`
pub const DEFAULT_CAST_LIMIT: usize = 5;

/// Store-side filter: title present, IMDb rating and votes present and
/// non-blank, at least one genre and one cast member.
pub fn meets_ingestion_contract(raw: &RawMovie) -> bool {
    let has_title = raw.title.as_ref().is_some_and(|t| !t.is_null());
    let (has_rating, has_votes) = match &raw.imdb {
        Some(imdb) => (
            imdb.rating.as_ref().is_some_and(|v| !is_blank(v)),
            imdb.votes.as_ref().is_some_and(|v| !is_blank(v)),
        ),
        None => (false, false),
    };
    let has_genres = raw.genres.as_ref().is_some_and(|g| !g.is_empty());
    let has_cast = raw.cast.as_ref().is_some_and(|c| !c.is_empty());

    has_title && has_rating && has_votes && has_genres && has_cast
}

/// Lower-case a director name and drop every whitespace character
pub fn normalize_director(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Clean raw documents into catalog records.
///
/// Numeric coercion failures default to 0 and never abort; a record is
/// dropped only when its vote count is not strictly positive or its genre
/// string is blank. A record without a usable title is also dropped.
pub fn clean_movies(raw_movies: Vec<RawMovie>, cast_limit: usize) -> Vec<MovieRecord> {
    let input = raw_movies.len();
    let cleaned: Vec<MovieRecord> = raw_movies
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| clean_one(raw, position, cast_limit))
        .filter(|movie| movie.imdb_votes > 0 && !movie.genres_str.trim().is_empty())
        .collect();

    debug!("Cleaned {} raw documents into {} records", input, cleaned.len());
    cleaned
}

fn clean_one(raw: RawMovie, position: usize, cast_limit: usize) -> Option<MovieRecord> {
    let title = raw.title.as_ref().filter(|t| !t.is_null()).map(stringify)?;

    // Documents without an id still need a stable key for the id index
    let id = raw
        .id
        .as_ref()
        .and_then(coerce_id)
        .unwrap_or_else(|| format!("row-{position}"));

    let (imdb_rating, imdb_votes) = match &raw.imdb {
        Some(imdb) => (
            imdb.rating.as_ref().and_then(coerce_f64).unwrap_or(0.0),
            imdb.votes.as_ref().and_then(coerce_count).unwrap_or(0),
        ),
        None => (0.0, 0),
    };

    let viewer = raw.tomatoes.as_ref().and_then(|t| t.viewer.as_ref());
    let tomato_rating = viewer.and_then(|v| v.rating.as_ref()).and_then(coerce_f64);
    let tomato_count = viewer
        .and_then(|v| v.num_reviews.as_ref())
        .and_then(coerce_count);

    let genres = raw.genres.unwrap_or_default();
    let cast = raw.cast.unwrap_or_default();
    let directors = raw.directors.unwrap_or_default();

    let genres_str = genres.join(", ");
    let cast_str = cast
        .iter()
        .take(cast_limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let directors_clean = directors
        .iter()
        .map(|d| normalize_director(d))
        .collect::<Vec<_>>()
        .join(", ");

    Some(MovieRecord {
        id,
        title_clean: title.clone(),
        title,
        year: raw.year.as_ref().and_then(coerce_year),
        genres,
        cast,
        directors,
        writers: raw.writers.unwrap_or_default(),
        plot: raw.plot,
        fullplot: raw.fullplot,
        languages: raw.languages.unwrap_or_default(),
        countries: raw.countries.unwrap_or_default(),
        runtime: raw
            .runtime
            .as_ref()
            .and_then(coerce_count)
            .and_then(|r| u32::try_from(r).ok()),
        poster: raw.poster,
        awards: raw.awards,
        kind: raw.kind,
        imdb_rating,
        imdb_votes,
        tomato_rating,
        tomato_count,
        genres_str,
        cast_str,
        directors_clean,
        weighted_rating: 0.0,
        soup: String::new(),
    })
}
