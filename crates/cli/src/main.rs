use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{JsonMovieStore, MovieRecord, RatingsStore};
use engine::{Recommendation, TrainedModel, TrainingConfig, DEFAULT_LIMIT, DEFAULT_PERCENTILE};
use server::{RecommenderService, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::warn;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendation engine", long_about = None)]
struct Cli {
    /// Movie metadata export (JSON array or JSON lines)
    #[arg(short, long, env = "MOVIES_PATH", default_value = "data/movies.json")]
    movies: PathBuf,

    /// User ratings export
    #[arg(short, long, env = "RATINGS_PATH")]
    ratings: Option<PathBuf>,

    /// Vote-count percentile for the weighted rating
    #[arg(long, default_value_t = DEFAULT_PERCENTILE)]
    percentile: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User identifier (email) as stored with the ratings
        #[arg(long)]
        user: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Show similarity and hybrid scores
        #[arg(long)]
        explain: bool,
    },

    /// Movies most similar to a title
    Similar {
        /// Exact catalog title
        #[arg(long)]
        title: String,

        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Re-rank by similarity x rating
        #[arg(long)]
        hybrid: bool,

        /// Keep the title itself in the list
        #[arg(long)]
        include_self: bool,
    },

    /// Top movies by weighted rating
    Top {
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = TrainingConfig::default().with_percentile(cli.percentile);

    match cli.command {
        Commands::Recommend {
            user,
            limit,
            explain,
        } => {
            let service = build_service(&cli.movies, cli.ratings.as_ref(), config).await?;
            handle_recommend(&service, &user, limit, explain).await?
        }
        Commands::Similar {
            title,
            limit,
            hybrid,
            include_self,
        } => {
            let model = train_model(&cli.movies, &config)?;
            handle_similar(&model, &title, limit, hybrid, include_self)?
        }
        Commands::Top { limit } => {
            let model = train_model(&cli.movies, &config)?;
            print_recommendations("Top rated movies:", &model.top_rated(limit), false);
        }
        Commands::Search { title, limit } => {
            let model = train_model(&cli.movies, &config)?;
            handle_search(&model, &title, limit);
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let ratings = load_ratings(cli.ratings.as_ref())?;
            let users: Vec<String> = ratings.users().into_iter().map(str::to_string).collect();
            let service = Arc::new(RecommenderService::new(
                Arc::new(JsonMovieStore::new(&cli.movies)),
                Arc::new(ratings),
                config,
                ServiceConfig::default(),
            ));
            train_service(&service).await?;
            handle_benchmark(service, users, requests, concurrent).await?
        }
    }

    Ok(())
}

fn load_ratings(path: Option<&PathBuf>) -> Result<RatingsStore> {
    match path {
        Some(path) => RatingsStore::load(path)
            .with_context(|| format!("Failed to load ratings from {}", path.display())),
        None => {
            warn!("No ratings export given; recommendations fall back to top-rated");
            Ok(RatingsStore::default())
        }
    }
}

/// Train directly from the movie export
fn train_model(movies: &PathBuf, config: &TrainingConfig) -> Result<TrainedModel> {
    println!("Training on {}...", movies.display());
    let start = Instant::now();
    let model = TrainedModel::train(&JsonMovieStore::new(movies), config)
        .context("Failed to train recommender")?;
    println!(
        "{} Trained on {} movies in {:?}",
        "✓".green(),
        model.movie_count(),
        start.elapsed()
    );
    Ok(model)
}

async fn train_service(service: &RecommenderService) -> Result<()> {
    let start = Instant::now();
    let model = service
        .train()
        .await
        .context("Failed to train recommender")?;
    println!(
        "{} Trained on {} movies in {:?}",
        "✓".green(),
        model.movie_count(),
        start.elapsed()
    );
    Ok(())
}

async fn build_service(
    movies: &PathBuf,
    ratings: Option<&PathBuf>,
    config: TrainingConfig,
) -> Result<RecommenderService> {
    let service = RecommenderService::new(
        Arc::new(JsonMovieStore::new(movies)),
        Arc::new(load_ratings(ratings)?),
        config,
        ServiceConfig::default(),
    );
    train_service(&service).await?;
    Ok(service)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    service: &RecommenderService,
    user: &str,
    limit: usize,
    explain: bool,
) -> Result<()> {
    let recommendations = service.recommend(user, limit).await?;
    let header = format!("Movie Recommendations for {}:", user);
    print_recommendations(&header, &recommendations, explain);
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(
    model: &TrainedModel,
    title: &str,
    limit: usize,
    hybrid: bool,
    include_self: bool,
) -> Result<()> {
    if model.resolve_index(title).is_none() {
        let hint = model
            .search(title, 5)
            .iter()
            .map(|m| m.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(anyhow!(
            "Title {:?} not found (exact match required). Close matches: {}",
            title,
            if hint.is_empty() { "none" } else { hint.as_str() }
        ));
    }

    let exclude_self = !include_self;
    let recommendations = if hybrid {
        model.hybrid_recommendations(title, limit, exclude_self)
    } else {
        model.get_recommendations(title, limit, exclude_self)
    };
    print_recommendations(&format!("Similar to {}:", title), &recommendations, true);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(model: &TrainedModel, title: &str, limit: usize) {
    let title_lower = title.to_lowercase();
    let mut matches: Vec<&MovieRecord> = model.search(title, usize::MAX);

    // Exact (case-insensitive) matches first, then by weighted rating
    matches.sort_by(|a, b| {
        let a_exact = a.title.to_lowercase() != title_lower;
        let b_exact = b.title.to_lowercase() != title_lower;
        a_exact.cmp(&b_exact).then_with(|| {
            b.weighted_rating
                .partial_cmp(&a.weighted_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    for movie in matches.iter().take(limit) {
        println!(
            "{}: {} ({}) [{}] imdb {:.1} ({} votes), weighted {:.2}",
            movie.id,
            movie.title,
            year_label(movie),
            movie.genres_str,
            movie.imdb_rating,
            movie.imdb_votes,
            movie.weighted_rating
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: Arc<RecommenderService>,
    users: Vec<String>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    // Pick random known users; without ratings every request takes the fallback path
    let picks: Vec<String> = (0..requests)
        .map(|i| {
            if users.is_empty() {
                format!("bench-user-{}@example.com", i)
            } else {
                users[rand::random_range(0..users.len())].clone()
            }
        })
        .collect();

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();
    let mut handles = vec![];
    for user in picks {
        let service = Arc::clone(&service);
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            service.recommend(&user, DEFAULT_LIMIT).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let percentile = |q: f32| timings[((timings.len() as f32 * q) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn year_label(movie: &MovieRecord) -> String {
    movie
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "????".to_string())
}

/// Helper function to format and print recommendations
fn print_recommendations(header: &str, recommendations: &[Recommendation], explain: bool) {
    println!("{}", header.bold().blue());
    if recommendations.is_empty() {
        println!("  (no recommendations)");
        return;
    }

    for (i, rec) in recommendations.iter().enumerate() {
        let movie = &rec.movie;
        println!(
            "{}. {} ({}) [{}] - Weighted rating: {:.2}",
            (i + 1).to_string().green(),
            movie.title,
            year_label(movie),
            movie.genres_str,
            movie.weighted_rating
        );
        if explain {
            match (rec.similarity_score, rec.hybrid_score) {
                (Some(similarity), Some(hybrid)) => println!(
                    "   similarity {:.3} x rating {:.1} = hybrid {:.3}",
                    similarity,
                    movie.average_rating(),
                    hybrid
                ),
                (Some(similarity), None) => println!("   similarity {:.3}", similarity),
                _ => println!("   {}", "top-rated fallback".dimmed()),
            }
        }
    }
}
