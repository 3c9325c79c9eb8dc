pub mod handlers;

use axum::{routing::get, Router};

use crate::shared::AppState;

/// The full HTTP surface: liveness, match-id scrape, and the complete
/// scrape-and-aggregate pipeline.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/matches", get(handlers::list_matches))
        .route("/stats", get(handlers::match_stats))
        .with_state(state)
}
