//! End-to-end ranking scenarios over small trained catalogs.

use data_loader::{RawImdb, RawMovie, UserRating};
use engine::{RecommendationSource, TrainedModel, TrainingConfig, DEFAULT_LIMIT};
use serde_json::json;

fn movie(id: &str, title: &str, directors: &[&str], genres: &[&str], rating: f64, votes: u64) -> RawMovie {
    RawMovie {
        id: Some(json!({"$oid": id})),
        title: Some(json!(title)),
        genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        cast: Some(vec!["Lead".to_string()]),
        directors: Some(directors.iter().map(|d| d.to_string()).collect()),
        imdb: Some(RawImdb {
            rating: Some(json!(rating)),
            votes: Some(json!(votes)),
        }),
        ..Default::default()
    }
}

fn rating(movie_id: &str, value: f64, timestamp: i64) -> UserRating {
    UserRating {
        email: "viewer@example.com".to_string(),
        movie_id: movie_id.to_string(),
        rating: value,
        timestamp,
    }
}

fn create_test_catalog() -> Vec<RawMovie> {
    vec![
        movie("j1", "Jaws", &["Steven Spielberg"], &["Adventure", "Thriller"], 8.0, 560_000),
        movie("j2", "Jaws 2", &["Jeannot Szwarc"], &["Adventure", "Horror", "Thriller"], 5.8, 80_000),
        movie("j3", "Jaws 3-D", &["Joe Alves"], &["Adventure", "Horror", "Thriller"], 3.7, 40_000),
        movie("s1", "Duel", &["Steven Spielberg"], &["Action", "Thriller"], 7.6, 60_000),
        movie("s2", "Jurassic Park", &["Steven Spielberg"], &["Adventure", "Sci-Fi"], 8.2, 900_000),
        movie("s3", "Hook", &["Steven Spielberg"], &["Adventure", "Comedy", "Family"], 6.8, 220_000),
        movie("a1", "Alien", &["Ridley Scott"], &["Horror", "Sci-Fi"], 8.5, 850_000),
        movie("a2", "Aliens", &["James Cameron"], &["Action", "Adventure", "Sci-Fi"], 8.4, 700_000),
        movie("w1", "Annie Hall", &["Woody Allen"], &["Comedy", "Romance"], 8.0, 260_000),
        movie("w2", "Manhattan", &["Woody Allen"], &["Comedy", "Drama", "Romance"], 7.9, 140_000),
        movie("d1", "The Deep", &["Peter Yates"], &["Adventure", "Mystery", "Thriller"], 5.8, 10_000),
        movie("d2", "Orca", &["Michael Anderson"], &["Adventure", "Drama", "Horror"], 5.0, 12_000),
    ]
}

fn train() -> TrainedModel {
    TrainedModel::from_raw(create_test_catalog(), &TrainingConfig::default(), "fixture").unwrap()
}

// =============================================================================
// Weighted rating
// =============================================================================

#[test]
fn test_few_votes_do_not_beat_well_voted_movies() {
    // A: solid and well voted; B: near-perfect on five votes; C: decent
    // and well voted. The padding titles pull the corpus mean below A.
    let catalog = vec![
        movie("A", "A", &[], &["Drama"], 8.0, 1000),
        movie("B", "B", &[], &["Drama"], 9.5, 5),
        movie("C", "C", &[], &["Drama"], 7.0, 800),
        movie("D", "D", &[], &["Drama"], 6.5, 900),
        movie("E", "E", &[], &["Drama"], 6.0, 950),
        movie("F", "F", &[], &["Drama"], 6.2, 850),
    ];
    let model = TrainedModel::from_raw(catalog, &TrainingConfig::default(), "abc").unwrap();

    let stats = model.stats();
    assert!((stats.mean_rating - 7.2).abs() < 1e-9);
    assert!((stats.vote_threshold - 987.5).abs() < 1e-9);

    let score = |title: &str| {
        let row = model.resolve_index(title).unwrap();
        model.movie(row).unwrap().weighted_rating
    };
    assert!(score("A") > score("B"));
    assert!(score("B") < 9.5);
    assert!((score("B") - stats.mean_rating).abs() < 0.1);

    let top: Vec<String> = model.top_rated(3).into_iter().map(|r| r.movie.title).collect();
    assert_eq!(top[0], "A");
}

// =============================================================================
// Similarity and hybrid ranking
// =============================================================================

#[test]
fn test_never_recommends_itself_when_excluded() {
    let model = train();
    for movie in model.movies() {
        let recs = model.get_recommendations(&movie.title, DEFAULT_LIMIT, true);
        assert!(recs.iter().all(|r| r.movie.title != movie.title));
        assert!(recs.len() <= DEFAULT_LIMIT);
    }
}

#[test]
fn test_seed_first_when_included() {
    let model = train();
    for movie in model.movies() {
        let recs = model.get_recommendations(&movie.title, 4, false);
        assert_eq!(recs[0].movie.title, movie.title);
        assert!(recs.len() <= 4);
    }
}

#[test]
fn test_n_larger_than_catalog_returns_everything_once() {
    let model = train();
    let recs = model.get_recommendations("Jaws", 100, true);
    assert_eq!(recs.len(), model.movie_count() - 1);
    assert_eq!(model.top_rated(100).len(), model.movie_count());
}

#[test]
fn test_hybrid_candidates_come_from_similarity_top_n() {
    let model = train();
    for n in 1..=6 {
        let base: Vec<String> = model
            .get_recommendations("Jaws", n, true)
            .into_iter()
            .map(|r| r.movie.title)
            .collect();
        let hybrid = model.hybrid_recommendations("Jaws", n, true);

        assert_eq!(hybrid.len(), base.len());
        assert!(hybrid.iter().all(|r| base.contains(&r.movie.title)));
        assert!(hybrid
            .windows(2)
            .all(|w| w[0].hybrid_score.unwrap() >= w[1].hybrid_score.unwrap()));
    }
}

#[test]
fn test_sequels_are_nearest_to_jaws() {
    let model = train();
    let titles: Vec<String> = model
        .get_recommendations("Jaws", 2, true)
        .into_iter()
        .map(|r| r.movie.title)
        .collect();
    assert!(titles.contains(&"Jaws 2".to_string()));
}

// =============================================================================
// Seed resolution
// =============================================================================

#[test]
fn test_history_mapping_to_jaws() {
    let model = train();
    let history = vec![rating("missing", 5.0, 9), rating("j1", 5.0, 3), rating("a1", 4.0, 7)];

    let (source, recs) = model.recommend_from_history(&history, DEFAULT_LIMIT);
    assert_eq!(source, RecommendationSource::Seeded("Jaws".to_string()));
    assert_eq!(recs, model.hybrid_recommendations("Jaws", DEFAULT_LIMIT, true));
}

#[test]
fn test_unmapped_history_falls_back_to_top_ten() {
    let model = train();
    let history = vec![rating("nope", 5.0, 1), rating("also-nope", 3.0, 2)];

    let (source, recs) = model.recommend_from_history(&history, DEFAULT_LIMIT);
    assert_eq!(source, RecommendationSource::Fallback);
    assert_eq!(recs, model.top_rated(DEFAULT_LIMIT));
    assert_eq!(recs.len(), 10);
    assert!(recs
        .windows(2)
        .all(|w| w[0].movie.weighted_rating >= w[1].movie.weighted_rating));
}

#[test]
fn test_empty_history_falls_back() {
    let model = train();
    let (source, recs) = model.recommend_from_history(&[], 3);
    assert_eq!(source, RecommendationSource::Fallback);
    assert_eq!(recs.len(), 3);
}
