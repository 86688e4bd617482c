//! Text "soup" each movie is vectorized from.

use data_loader::MovieRecord;
use rayon::prelude::*;

/// Cleaned title, director names and genre string joined by single spaces.
///
/// Empty parts still contribute their separator; the tokenizer ignores
/// the extra whitespace.
pub fn build_soup(movie: &MovieRecord) -> String {
    [
        movie.title_clean.as_str(),
        movie.directors_clean.as_str(),
        movie.genres_str.as_str(),
    ]
    .join(" ")
}

/// Fill `soup` on every movie in place
pub fn fill_soups(movies: &mut [MovieRecord]) {
    movies.par_iter_mut().for_each(|movie| {
        movie.soup = build_soup(movie);
    });
}
