pub mod aggregator;
pub mod fetcher;
pub mod models;

mod errors;

pub use aggregator::StatsAggregator;
pub use errors::StatsError;
pub use fetcher::{LeetifyStatsFetcher, RetryingFetcher, StatsFetcher};
pub use models::{MatchOutcome, MatchReport, PlayerSummary, RawMatchPayload, RawPlayerStats};
