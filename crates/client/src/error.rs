//! Client error types.

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ynab {endpoint} request failed: {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
}
