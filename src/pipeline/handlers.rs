use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::shared::{AppError, AppState, MatchId};
use crate::stats::MatchReport;

/// GET / — liveness probe.
pub async fn liveness() -> &'static str {
    "Leetify Scraper API is running"
}

/// GET /matches — logs in, scrapes the rendered match list, and returns
/// the ids. An empty list is a normal 200 response.
#[instrument(name = "list_matches", skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchId>>, AppError> {
    let ids = state.match_source.fetch_match_ids().await?;
    info!(count = ids.len(), "match list scraped");
    Ok(Json(ids))
}

/// GET /stats — the full pipeline: scrape the id list, then fan out one
/// stats fetch per match.
#[instrument(name = "match_stats", skip(state))]
pub async fn match_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchReport>>, AppError> {
    let ids = state.match_source.fetch_match_ids().await?;
    let reports = state.aggregator.aggregate_all(&ids).await?;
    info!(matches = reports.len(), "stats aggregated");
    Ok(Json(reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::router;
    use crate::shared::test_utils::{AppStateBuilder, StubFetcher, StubMatchSource};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn liveness_returns_plain_text() {
        let app = router(AppStateBuilder::new().build());

        let (status, body) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Leetify Scraper API is running");
    }

    #[tokio::test]
    async fn matches_returns_id_strings_in_order() {
        let state = AppStateBuilder::new()
            .with_match_source(Arc::new(StubMatchSource::with_ids(vec![
                MatchId::from("newest"),
                MatchId::from("older"),
            ])))
            .build();

        let (status, body) = get(router(state), "/matches").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(ids, vec!["newest", "older"]);
    }

    #[tokio::test]
    async fn matches_maps_scrape_failure_to_generic_500() {
        let state = AppStateBuilder::new()
            .with_match_source(Arc::new(StubMatchSource::failing()))
            .build();

        let (status, body) = get(router(state), "/matches").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            payload["error"],
            "An error occurred while fetching matches"
        );
    }

    #[tokio::test]
    async fn stats_returns_one_report_per_match() {
        let state = AppStateBuilder::new()
            .with_match_source(Arc::new(StubMatchSource::with_ids(vec![
                MatchId::from("m1"),
                MatchId::from("m2"),
            ])))
            .build();

        let (status, body) = get(router(state), "/stats").await;

        assert_eq!(status, StatusCode::OK);
        let reports: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(reports.len(), 2);
        // Each report is itself an array ending in the outcome record.
        assert_eq!(reports[0].as_array().unwrap().last().unwrap()["map"], "m1");
        assert_eq!(reports[1].as_array().unwrap().last().unwrap()["map"], "m2");
    }

    #[tokio::test]
    async fn stats_with_no_matches_is_an_empty_array() {
        let state = AppStateBuilder::new()
            .with_match_source(Arc::new(StubMatchSource::with_ids(vec![])))
            .build();

        let (status, body) = get(router(state), "/stats").await;

        assert_eq!(status, StatusCode::OK);
        let reports: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn stats_maps_fetch_failure_to_generic_500() {
        let state = AppStateBuilder::new()
            .with_match_source(Arc::new(StubMatchSource::with_ids(vec![MatchId::from(
                "m1",
            )])))
            .with_fetcher(Arc::new(StubFetcher::failing()))
            .build();

        let (status, body) = get(router(state), "/stats").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"], "An error occurred while fetching stats");
    }
}
