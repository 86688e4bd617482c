//! HTTP tests for the recommendation API.
//!
//! Each test drives the axum router directly with `oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use data_loader::{InMemoryMovieStore, RatingsStore, RawImdb, RawMovie, UserRating};
use engine::TrainingConfig;
use server::{build_router, AppState, RecommenderService, ServiceConfig};

fn raw(id: &str, title: &str, genres: &[&str], rating: Value, votes: u64) -> RawMovie {
    RawMovie {
        id: Some(json!({"$oid": id})),
        title: Some(json!(title)),
        genres: Some(genres.iter().map(|g| g.to_string()).collect()),
        cast: Some(vec!["Someone".to_string()]),
        directors: Some(vec!["Some Director".to_string()]),
        imdb: Some(RawImdb {
            rating: Some(rating),
            votes: Some(json!(votes)),
        }),
        ..Default::default()
    }
}

fn catalog() -> Vec<RawMovie> {
    let mut movies = vec![
        raw("j1", "Jaws", &["Adventure", "Thriller"], json!(8.0), 500_000),
        raw("j2", "Jaws 2", &["Adventure", "Thriller"], json!(5.8), 80_000),
        raw("a1", "Alien", &["Horror", "Sci-Fi"], json!(8.5), 700_000),
        raw("w1", "Annie Hall", &["Comedy", "Romance"], json!(8.0), 250_000),
        // Unparseable rating coerces to 0 and stays in the catalog
        raw("x1", "Mystery Reel", &["Mystery"], json!("n/a"), 40),
    ];
    for i in 0..8 {
        movies.push(raw(
            &format!("p{i}"),
            &format!("Padding {i}"),
            &["Drama"],
            json!(6.0 + i as f64 / 10.0),
            1_000 + i * 100,
        ));
    }
    movies
}

fn ratings() -> RatingsStore {
    RatingsStore::from_ratings(vec![
        UserRating {
            email: "jaws-fan@example.com".to_string(),
            movie_id: "j1".to_string(),
            rating: 5.0,
            timestamp: 10,
        },
        UserRating {
            email: "lost@example.com".to_string(),
            movie_id: "deleted".to_string(),
            rating: 5.0,
            timestamp: 10,
        },
    ])
}

fn build_service() -> Arc<RecommenderService> {
    Arc::new(RecommenderService::new(
        Arc::new(InMemoryMovieStore::new(catalog())),
        Arc::new(ratings()),
        TrainingConfig::default(),
        ServiceConfig::default(),
    ))
}

async fn trained_app() -> (Router, Arc<RecommenderService>) {
    let service = build_service();
    service.train().await.unwrap();
    (build_router(AppState::new(Arc::clone(&service))), service)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn test_health_before_training() {
    let app = build_router(AppState::new(build_service()));
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["recommender_initialized"], false);
}

#[tokio::test]
async fn test_health_after_training() {
    let (app, _) = trained_app().await;
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommender_initialized"], true);
    assert_eq!(body["state"], "ready");
}

#[tokio::test]
async fn test_health_after_failed_training() {
    let service = Arc::new(RecommenderService::new(
        Arc::new(InMemoryMovieStore::new(Vec::new())),
        Arc::new(RatingsStore::default()),
        TrainingConfig::default(),
        ServiceConfig::default(),
    ));
    assert!(service.train().await.is_err());

    let (status, body) = get_json(build_router(AppState::new(service)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["recommender_initialized"], false);
}

// =============================================================================
// /recommend/:user
// =============================================================================

#[tokio::test]
async fn test_recommend_not_ready_is_503() {
    let app = build_router(AppState::new(build_service()));
    let (status, body) = get_json(app, "/recommend/jaws-fan@example.com").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not ready"));
}

#[tokio::test]
async fn test_recommend_seeded_user() {
    let (app, service) = trained_app().await;
    let (status, body) = get_json(app, "/recommend/jaws-fan@example.com").await;
    assert_eq!(status, StatusCode::OK);

    let model = service.snapshot().await.unwrap();
    let expected: Vec<String> = model
        .hybrid_recommendations("Jaws", 10, true)
        .into_iter()
        .map(|r| r.movie.title)
        .collect();

    let items = body.as_array().unwrap();
    let titles: Vec<&str> = items.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, expected);
    assert!(items.len() <= 10);
    assert!(items.iter().all(|m| m["title"] != "Jaws"));
    assert!(items.iter().all(|m| m["hybrid_score"].is_number()));
    assert!(items[0]["_id"].is_string());
}

#[tokio::test]
async fn test_recommend_unmapped_user_gets_top_rated() {
    let (app, service) = trained_app().await;
    let (status, body) = get_json(app, "/recommend/lost@example.com").await;
    assert_eq!(status, StatusCode::OK);

    let model = service.snapshot().await.unwrap();
    let expected: Vec<String> = model.top_rated(10).into_iter().map(|r| r.movie.title).collect();

    let items = body.as_array().unwrap();
    let titles: Vec<&str> = items.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, expected);
    assert!(items.iter().all(|m| m["similarity_score"].is_null()));
    assert!(items.iter().all(|m| m["hybrid_score"].is_null()));
}

#[tokio::test]
async fn test_recommend_respects_n() {
    let (app, _) = trained_app().await;
    let (_, body) = get_json(app.clone(), "/recommend/lost@example.com?n=3").await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get_json(app.clone(), "/recommend/lost@example.com?n=0").await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = get_json(app, "/recommend/lost@example.com?n=-1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommend_n_larger_than_catalog() {
    let (app, service) = trained_app().await;
    let total = service.snapshot().await.unwrap().movie_count();

    let (_, body) = get_json(app, "/recommend/nobody@example.com?n=500").await;
    assert_eq!(body.as_array().unwrap().len(), total);
}

// =============================================================================
// /retrain
// =============================================================================

#[tokio::test]
async fn test_retrain_accepted_then_conflict() {
    let (app, service) = trained_app().await;

    // Hold a run open so the HTTP request collides with it
    let ticket = service.begin_training().await.unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/retrain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Still serving the old model while training
    let (status, _) = get_json(app.clone(), "/recommend/lost@example.com").await;
    assert_eq!(status, StatusCode::OK);

    service.run_training(ticket).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/retrain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
