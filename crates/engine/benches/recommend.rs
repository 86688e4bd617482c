//! Benchmarks for training and ranking
//!
//! Run with: cargo bench --package engine
//!
//! Uses a synthetic catalog so no export files are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{RawImdb, RawMovie};
use engine::{TrainedModel, TrainingConfig};
use serde_json::json;

const GENRES: &[&str] = &[
    "Action", "Adventure", "Comedy", "Crime", "Drama", "Fantasy", "Horror", "Mystery",
    "Romance", "Sci-Fi", "Thriller", "War", "Western",
];

fn synthetic_catalog(size: usize) -> Vec<RawMovie> {
    (0..size)
        .map(|i| RawMovie {
            id: Some(json!(format!("m{i}"))),
            title: Some(json!(format!("Movie Number {i}"))),
            genres: Some(vec![
                GENRES[i % GENRES.len()].to_string(),
                GENRES[(i * 7 + 3) % GENRES.len()].to_string(),
            ]),
            cast: Some(vec![format!("Actor {}", i % 97)]),
            directors: Some(vec![format!("Director {}", i % 53)]),
            imdb: Some(RawImdb {
                rating: Some(json!(4.0 + (i % 50) as f64 / 10.0)),
                votes: Some(json!(10 + (i * 37) % 5_000)),
            }),
            ..Default::default()
        })
        .collect()
}

fn bench_train(c: &mut Criterion) {
    let catalog = synthetic_catalog(2_000);
    let config = TrainingConfig::default();

    c.bench_function("train_2000_movies", |b| {
        b.iter(|| {
            let model = TrainedModel::from_raw(black_box(catalog.clone()), &config, "bench").unwrap();
            black_box(model)
        })
    });
}

fn bench_recommendations(c: &mut Criterion) {
    let model =
        TrainedModel::from_raw(synthetic_catalog(2_000), &TrainingConfig::default(), "bench").unwrap();

    c.bench_function("get_recommendations", |b| {
        b.iter(|| black_box(model.get_recommendations(black_box("Movie Number 42"), 10, true)))
    });

    c.bench_function("hybrid_recommendations", |b| {
        b.iter(|| black_box(model.hybrid_recommendations(black_box("Movie Number 42"), 10, true)))
    });
}

criterion_group!(benches, bench_train, bench_recommendations);
criterion_main!(benches);
