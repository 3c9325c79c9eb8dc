use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::errors::ScrapeError;
use crate::config::{BrowserOptions, DeploymentMode};

/// One headless Chrome process, owned for the duration of a single scrape.
///
/// Callers must call [`BrowserSession::close`] on every exit path; a session
/// that is dropped without closing leaks the Chrome process.
pub struct BrowserSession {
    browser: Browser,
    event_loop: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScrapeError> {
        let config = build_config(options).map_err(ScrapeError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(ScrapeError::launch)?;

        // The CDP connection only makes progress while its event stream is
        // being drained.
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(%err, "cdp event loop error");
                }
            }
        });

        Ok(Self {
            browser,
            event_loop,
        })
    }

    pub async fn new_page(&self) -> Result<Page, ScrapeError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(ScrapeError::navigation)
    }

    /// Tears the browser process down. Consumes the session so it cannot be
    /// closed twice.
    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            warn!(%err, "browser close failed");
        }
        if let Err(err) = self.browser.wait().await {
            warn!(%err, "waiting for browser exit failed");
        }
        self.event_loop.abort();
    }
}

fn build_config(options: &BrowserOptions) -> Result<BrowserConfig, String> {
    let mut builder =
        BrowserConfig::builder().args(vec!["--no-sandbox", "--disable-setuid-sandbox"]);

    // Restricted containers can't use Chrome's sandbox, /dev/shm, or a
    // multi-process engine, and need an explicit binary path.
    if options.mode == DeploymentMode::Production {
        builder = builder
            .args(vec!["--disable-dev-shm-usage", "--single-process"])
            .chrome_executable(options.chrome_executable());
    }

    builder.build()
}
