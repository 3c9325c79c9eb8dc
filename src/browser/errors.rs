use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(&'static str),

    #[error("Match list did not load within {0} ms")]
    MatchListTimeout(u64),

    #[error("Page script evaluation failed: {0}")]
    Evaluation(String),
}

impl ScrapeError {
    pub(crate) fn launch(err: impl std::fmt::Display) -> Self {
        Self::Launch(err.to_string())
    }

    pub(crate) fn navigation(err: impl std::fmt::Display) -> Self {
        Self::Navigation(err.to_string())
    }

    pub(crate) fn evaluation(err: impl std::fmt::Display) -> Self {
        Self::Evaluation(err.to_string())
    }
}
