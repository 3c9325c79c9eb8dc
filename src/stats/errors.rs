use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Stats API returned {status} for match {id}")]
    Status {
        id: String,
        status: reqwest::StatusCode,
    },
}
