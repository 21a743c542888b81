use thiserror::Error;

/// Network-level failure while retrieving an airline page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// The page was retrieved but its expected structure is absent. Fatal for
/// the current run; the next scheduled run retries the whole cycle.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("unexpected page structure: {0}")]
    Structure(String),
}

/// Writing the new state baseline failed. Fatal: the caller must not pretend
/// the snapshot was recorded.
#[derive(Debug, Error)]
pub enum StateSaveError {
    #[error("failed to write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Slack delivery failed. Fatal, and raised before state is persisted so a
/// dropped notification is retried by the next run.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),
    #[error("failed to encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),
}
