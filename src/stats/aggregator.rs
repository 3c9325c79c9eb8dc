use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use super::errors::StatsError;
use super::fetcher::StatsFetcher;
use super::models::MatchReport;
use crate::shared::MatchId;

/// Fans the fetcher out over all ids, at most `limit` requests in flight.
pub struct StatsAggregator {
    fetcher: Arc<dyn StatsFetcher>,
    limit: usize,
}

impl StatsAggregator {
    pub fn new(fetcher: Arc<dyn StatsFetcher>, limit: usize) -> Self {
        Self {
            fetcher,
            limit: limit.max(1),
        }
    }

    /// All-or-nothing join: the first failed fetch fails the whole call and
    /// in-flight successes are dropped. Output order follows input order,
    /// not completion order.
    pub async fn aggregate_all(&self, ids: &[MatchId]) -> Result<Vec<MatchReport>, StatsError> {
        debug!(matches = ids.len(), limit = self.limit, "aggregating match stats");
        let semaphore = Arc::new(Semaphore::new(self.limit));

        let fetches = ids.iter().map(|id| {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                fetcher.fetch(id).await
            }
        });

        try_join_all(fetches).await
    }
}
