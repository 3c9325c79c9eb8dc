use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use leetify_scraper::stats::{MatchOutcome, MatchReport, PlayerSummary};
use leetify_scraper::{MatchId, MatchIdSource, ScrapeError, StatsError, StatsFetcher};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Match source returning a scripted id list and counting how often it is
/// asked, or failing with a scripted error.
pub struct MockMatchSource {
    ids: Option<Vec<MatchId>>,
    calls: AtomicUsize,
}

impl MockMatchSource {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            ids: Some(ids.iter().map(|id| MatchId::from(*id)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            ids: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchIdSource for MockMatchSource {
    async fn fetch_match_ids(&self) -> Result<Vec<MatchId>, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ids
            .clone()
            .ok_or_else(|| ScrapeError::Navigation("mock navigation failure".to_string()))
    }
}

/// Fetcher serving canned reports per id, with optional per-id delays so
/// tests can force completion order to differ from input order. Unknown
/// ids fail the fetch.
pub struct MockStatsFetcher {
    reports: HashMap<String, MatchReport>,
    delays: HashMap<String, Duration>,
}

impl MockStatsFetcher {
    pub fn new() -> Self {
        Self {
            reports: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    pub fn with_report(mut self, id: &str, report: MatchReport) -> Self {
        self.reports.insert(id.to_string(), report);
        self
    }

    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }
}

#[async_trait]
impl StatsFetcher for MockStatsFetcher {
    async fn fetch(&self, id: &MatchId) -> Result<MatchReport, StatsError> {
        if let Some(delay) = self.delays.get(id.as_str()) {
            sleep(*delay).await;
        }
        self.reports
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StatsError::Status {
                id: id.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

pub fn sample_report(map: &str, player_names: &[&str], match_won: Option<bool>) -> MatchReport {
    MatchReport {
        players: player_names
            .iter()
            .map(|name| PlayerSummary {
                name: name.to_string(),
                accuracy: 0.2,
                total_kills: 18,
                total_assists: 3,
                total_deaths: 12,
                total_damage: 1900,
                kd_ratio: 1.5,
            })
            .collect(),
        outcome: MatchOutcome {
            map: map.to_string(),
            score: json!([13, 9]),
            match_won,
        },
    }
}

pub fn into_source(source: MockMatchSource) -> Arc<MockMatchSource> {
    Arc::new(source)
}
