use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::errors::StatsError;
use super::models::{derive_match_won, MatchOutcome, MatchReport, PlayerSummary, RawMatchPayload, RawPlayerStats};
use crate::shared::MatchId;

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Per-match stats retrieval. One call, one report; failures are not
/// retried here (see [`RetryingFetcher`]).
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    async fn fetch(&self, id: &MatchId) -> Result<MatchReport, StatsError>;
}

pub struct LeetifyStatsFetcher {
    client: reqwest::Client,
    api_base: String,
    tracked_steam_ids: Vec<String>,
}

impl LeetifyStatsFetcher {
    pub fn new(api_base: impl Into<String>, tracked_steam_ids: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            tracked_steam_ids,
        }
    }
}

#[async_trait]
impl StatsFetcher for LeetifyStatsFetcher {
    async fn fetch(&self, id: &MatchId) -> Result<MatchReport, StatsError> {
        let url = format!("{}/api/games/{}", self.api_base, id);
        debug!(%id, "fetching match stats");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StatsError::Status {
                id: id.to_string(),
                status: response.status(),
            });
        }

        let payload: RawMatchPayload = response.json().await?;
        Ok(build_report(payload, &self.tracked_steam_ids))
    }
}

/// Reduces a raw payload to the tracked players plus the match outcome.
/// Filtering preserves the payload's original player order; untracked
/// players never survive it.
pub fn build_report(payload: RawMatchPayload, tracked_steam_ids: &[String]) -> MatchReport {
    let tracked: Vec<&RawPlayerStats> = payload
        .player_stats
        .iter()
        .filter(|player| tracked_steam_ids.iter().any(|id| *id == player.steam64_id))
        .collect();

    let match_won = derive_match_won(&tracked);
    let players = tracked.iter().map(|player| PlayerSummary::from(*player)).collect();

    MatchReport {
        players,
        outcome: MatchOutcome {
            map: payload.map_name,
            score: payload.team_scores,
            match_won,
        },
    }
}

/// Decorator adding a capped retry with fixed backoff around another
/// fetcher. The wrapped fetcher keeps its fail-once contract; resilience
/// is opt-in at composition time (`FETCH_RETRIES`).
pub struct RetryingFetcher<F> {
    inner: F,
    retries: u32,
    backoff: Duration,
}

impl<F> RetryingFetcher<F> {
    pub fn new(inner: F, retries: u32) -> Self {
        Self {
            inner,
            retries,
            backoff: RETRY_BACKOFF,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

#[async_trait]
impl<F: StatsFetcher> StatsFetcher for RetryingFetcher<F> {
    async fn fetch(&self, id: &MatchId) -> Result<MatchReport, StatsError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(id).await {
                Ok(report) => return Ok(report),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    warn!(%id, %err, attempt, "retrying match fetch");
                    sleep(self.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
