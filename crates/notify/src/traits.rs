//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{channel} responded with {status}")]
    Status {
        channel: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert. No retries.
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "log", "pushover").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching an alert to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub subject: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
