//! Server configuration from flags and environment.

use clap::Parser;
use engine::{TrainingConfig, DEFAULT_LIMIT, DEFAULT_PERCENTILE};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default bound on a single ratings lookup
pub const DEFAULT_RATINGS_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Parser, Debug, Clone)]
#[command(name = "reel-recs-server")]
#[command(about = "Content-based movie recommendation service", long_about = None)]
pub struct ServerArgs {
    /// Movie metadata export (JSON array or JSON lines)
    #[arg(long, env = "MOVIES_PATH", default_value = "data/movies.json")]
    pub movies_path: PathBuf,

    /// User ratings export; without it every user gets the top-rated list
    #[arg(long, env = "RATINGS_PATH")]
    pub ratings_path: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Recommendations per request when `?n=` is absent
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Vote-count percentile for the weighted rating
    #[arg(long, default_value_t = DEFAULT_PERCENTILE)]
    pub percentile: f64,

    /// Timeout for one ratings lookup, in milliseconds
    #[arg(long, env = "RATINGS_TIMEOUT_MS", default_value_t = 2000)]
    pub ratings_timeout_ms: u64,
}

impl ServerArgs {
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig::default().with_percentile(self.percentile)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::default()
            .with_default_limit(self.limit)
            .with_ratings_timeout(Duration::from_millis(self.ratings_timeout_ms))
    }
}

/// Per-request behaviour of the recommender service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub default_limit: usize,
    pub ratings_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            ratings_timeout: DEFAULT_RATINGS_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_ratings_timeout(mut self, timeout: Duration) -> Self {
        self.ratings_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServerArgs::try_parse_from(["reel-recs-server"]).unwrap();
        assert_eq!(args.bind, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.limit, 10);
        assert_eq!(args.percentile, 0.95);
        assert_eq!(args.service_config(), ServiceConfig::default());
    }

    #[test]
    fn test_flags_override() {
        let args = ServerArgs::try_parse_from([
            "reel-recs-server",
            "--movies-path",
            "/tmp/m.json",
            "--limit",
            "5",
            "--percentile",
            "0.8",
            "--ratings-timeout-ms",
            "50",
        ])
        .unwrap();
        assert_eq!(args.movies_path, PathBuf::from("/tmp/m.json"));
        assert_eq!(args.training_config().percentile, 0.8);
        assert_eq!(args.service_config().default_limit, 5);
        assert_eq!(args.service_config().ratings_timeout, Duration::from_millis(50));
    }
}
