use data_loader::{clean_movies, CatalogIndex, JsonMovieStore, MovieProvider, DEFAULT_CAST_LIMIT};
use std::env;
use std::time::Instant;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "data/movies.json".to_string());

    println!("Loading movie export from {}...\n", path);

    let start = Instant::now();
    let raw = JsonMovieStore::new(&path)
        .fetch_movies()
        .expect("Failed to load movie export");
    let fetched = raw.len();
    let movies = clean_movies(raw, DEFAULT_CAST_LIMIT);
    let index = CatalogIndex::build(&movies);
    let elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Fetched: {}", fetched);
    println!("Cleaned: {}", movies.len());
    println!("Distinct titles: {}", index.title_count());
    println!("\nPerformance: {:.0} documents/second",
             fetched as f64 / elapsed.as_secs_f64());
}
