// Library crate for the Leetify scraper API
// This file exposes the public API for integration tests

pub mod browser;
pub mod config;
pub mod pipeline;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use browser::{ChromeMatchSource, MatchIdSource, ScrapeError, ScrapeSession};
pub use config::AppConfig;
pub use shared::{AppError, AppState, MatchId};
pub use stats::{
    LeetifyStatsFetcher, MatchReport, RetryingFetcher, StatsAggregator, StatsError, StatsFetcher,
};
