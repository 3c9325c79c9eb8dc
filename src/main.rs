use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leetify_scraper::browser::ChromeMatchSource;
use leetify_scraper::config::AppConfig;
use leetify_scraper::pipeline;
use leetify_scraper::shared::AppState;
use leetify_scraper::stats::{LeetifyStatsFetcher, RetryingFetcher, StatsAggregator, StatsFetcher};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leetify_scraper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!(mode = ?config.browser.mode, "Starting Leetify scraper API");

    let match_source = Arc::new(ChromeMatchSource::new(&config));

    let fetcher: Arc<dyn StatsFetcher> = {
        let fetcher = LeetifyStatsFetcher::new(
            config.target.api_base.clone(),
            config.tracked_steam_ids.clone(),
        );
        if config.fetch_retries > 0 {
            Arc::new(RetryingFetcher::new(fetcher, config.fetch_retries))
        } else {
            Arc::new(fetcher)
        }
    };
    let aggregator = Arc::new(StatsAggregator::new(fetcher, config.fetch_concurrency));

    let app_state = AppState::new(match_source, aggregator);
    let app = pipeline::router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
