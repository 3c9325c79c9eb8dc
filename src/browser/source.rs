use async_trait::async_trait;
use tracing::info;

use super::errors::ScrapeError;
use super::session::BrowserSession;
use super::{extractor, navigator};
use crate::config::{AppConfig, BrowserOptions, Credentials, ScrapeTarget};
use crate::shared::MatchId;

/// Entry point of the browser stage: produce the authenticated user's match
/// ids. Everything behind this trait is replaceable in tests.
#[async_trait]
pub trait MatchIdSource: Send + Sync {
    async fn fetch_match_ids(&self) -> Result<Vec<MatchId>, ScrapeError>;
}

/// One login-and-scrape attempt inside an owned browser process. Split out
/// from [`ChromeMatchSource`] so the close-on-every-path guarantee can be
/// exercised with a test double.
#[async_trait]
pub trait ScrapeSession: Send {
    async fn login(&mut self) -> Result<(), ScrapeError>;
    async fn match_ids(&mut self) -> Result<Vec<MatchId>, ScrapeError>;
    async fn close(&mut self);
}

pub struct ChromeScrapeSession {
    session: Option<BrowserSession>,
    page: Option<chromiumoxide::Page>,
    credentials: Credentials,
    target: ScrapeTarget,
}

impl ChromeScrapeSession {
    pub async fn launch(
        options: &BrowserOptions,
        credentials: Credentials,
        target: ScrapeTarget,
    ) -> Result<Self, ScrapeError> {
        let session = BrowserSession::launch(options).await?;
        Ok(Self {
            session: Some(session),
            page: None,
            credentials,
            target,
        })
    }
}

#[async_trait]
impl ScrapeSession for ChromeScrapeSession {
    async fn login(&mut self) -> Result<(), ScrapeError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ScrapeError::Navigation("browser already closed".to_string()))?;
        let page = session.new_page().await?;
        navigator::login(&page, &self.credentials, &self.target).await?;
        self.page = Some(page);
        Ok(())
    }

    async fn match_ids(&mut self) -> Result<Vec<MatchId>, ScrapeError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| ScrapeError::Navigation("not logged in".to_string()))?;
        extractor::extract(page).await
    }

    async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}

/// Launches a fresh Chrome process per call; concurrent callers each get
/// their own, uncoordinated.
pub struct ChromeMatchSource {
    browser: BrowserOptions,
    credentials: Credentials,
    target: ScrapeTarget,
}

impl ChromeMatchSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            browser: config.browser.clone(),
            credentials: config.credentials.clone(),
            target: config.target.clone(),
        }
    }
}

#[async_trait]
impl MatchIdSource for ChromeMatchSource {
    async fn fetch_match_ids(&self) -> Result<Vec<MatchId>, ScrapeError> {
        let session = ChromeScrapeSession::launch(
            &self.browser,
            self.credentials.clone(),
            self.target.clone(),
        )
        .await?;
        let ids = drive(session).await?;
        info!(count = ids.len(), "scraped match ids");
        Ok(ids)
    }
}

/// Runs login and extraction, closing the session exactly once on every
/// path out, including when either stage fails. Each call owns one Chrome
/// process; keep it that way.
pub(crate) async fn drive<S: ScrapeSession>(mut session: S) -> Result<Vec<MatchId>, ScrapeError> {
    let result = scrape(&mut session).await;
    session.close().await;
    result
}

async fn scrape<S: ScrapeSession>(session: &mut S) -> Result<Vec<MatchId>, ScrapeError> {
    session.login().await?;
    session.match_ids().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy)]
    enum FailAt {
        Nowhere,
        Login,
        Extract,
    }

    struct CountingSession {
        fail_at: FailAt,
        close_count: Arc<AtomicUsize>,
    }

    impl CountingSession {
        fn new(fail_at: FailAt) -> (Self, Arc<AtomicUsize>) {
            let close_count = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    fail_at,
                    close_count: close_count.clone(),
                },
                close_count,
            )
        }
    }

    #[async_trait]
    impl ScrapeSession for CountingSession {
        async fn login(&mut self) -> Result<(), ScrapeError> {
            match self.fail_at {
                FailAt::Login => Err(ScrapeError::ElementNotFound("input[type=\"email\"]")),
                _ => Ok(()),
            }
        }

        async fn match_ids(&mut self) -> Result<Vec<MatchId>, ScrapeError> {
            match self.fail_at {
                FailAt::Extract => Err(ScrapeError::MatchListTimeout(30_000)),
                _ => Ok(vec![MatchId::from("match-1"), MatchId::from("match-2")]),
            }
        }

        async fn close(&mut self) {
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn closes_session_once_on_success() {
        let (session, close_count) = CountingSession::new(FailAt::Nowhere);

        let ids = drive(session).await.unwrap();

        assert_eq!(ids, vec![MatchId::from("match-1"), MatchId::from("match-2")]);
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closes_session_once_when_login_fails() {
        let (session, close_count) = CountingSession::new(FailAt::Login);

        let err = drive(session).await.err().unwrap();

        assert!(matches!(err, ScrapeError::ElementNotFound(_)));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closes_session_once_when_extraction_fails() {
        let (session, close_count) = CountingSession::new(FailAt::Extract);

        let err = drive(session).await.err().unwrap();

        assert!(matches!(err, ScrapeError::MatchListTimeout(30_000)));
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }
}
