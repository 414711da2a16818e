//! Pushover notification channel.
//!
//! Posts a form-encoded message to the Pushover messages endpoint.

use std::time::Duration;

use serde::Serialize;

use crate::traits::{Notifier, NotifyError};

pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application token, user key and optional target device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub app_token: String,
    pub user_key: String,
    pub device: Option<String>,
}

impl PushoverCredentials {
    pub fn is_complete(&self) -> bool {
        !self.app_token.is_empty() && !self.user_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct PushoverMessage<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<&'a str>,
}

pub struct PushoverNotifier {
    credentials: PushoverCredentials,
    endpoint: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(credentials: PushoverCredentials) -> Result<Self, NotifyError> {
        if !credentials.is_complete() {
            return Err(NotifyError::Config(
                "pushover notifier selected but credentials missing".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            credentials,
            endpoint: PUSHOVER_API_URL.to_string(),
            client,
        })
    }

    /// Send to a different messages endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        let form = PushoverMessage {
            token: &self.credentials.app_token,
            user: &self.credentials.user_key,
            title: subject,
            message,
            device: self
                .credentials
                .device
                .as_deref()
                .filter(|d| !d.is_empty()),
        };

        tracing::debug!(endpoint = %self.endpoint, title = subject, "Sending pushover message");

        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                channel: "pushover",
                status,
            });
        }

        tracing::info!(title = subject, "Pushover message sent");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "pushover"
    }
}
