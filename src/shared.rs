use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::browser::{MatchIdSource, ScrapeError};
use crate::stats::{StatsAggregator, StatsError};

/// Opaque match identifier: the trailing path segment of a match link.
/// Nothing beyond string equality is assumed about its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub match_source: Arc<dyn MatchIdSource>,
    pub aggregator: Arc<StatsAggregator>,
}

impl AppState {
    pub fn new(match_source: Arc<dyn MatchIdSource>, aggregator: Arc<StatsAggregator>) -> Self {
        Self {
            match_source,
            aggregator,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Scrape failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Stats aggregation failed: {0}")]
    Stats(#[from] StatsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full detail goes to the log; clients only ever see the generic
        // message.
        error!(error = %self, "request failed");

        let message = match self {
            AppError::Scrape(_) => "An error occurred while fetching matches",
            AppError::Stats(_) => "An error occurred while fetching stats",
        };

        let body = Json(json!({
            "error": message
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
