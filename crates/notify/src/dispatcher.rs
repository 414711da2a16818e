//! Routes alerts to configured channels.
//!
//! A rule may list channel ids in `notify`. Ids registered with the
//! dispatcher receive the alert; when none of them is registered the default
//! notifier does. Individual channel failures don't block other channels.

use std::collections::HashMap;

use crate::traits::{DispatchResult, Notifier};

pub struct Dispatcher {
    default_channel: Box<dyn Notifier>,
    /// Channel id → notifier.
    channels: HashMap<String, Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(default_channel: Box<dyn Notifier>) -> Self {
        Self {
            default_channel,
            channels: HashMap::new(),
        }
    }

    /// Register a named channel that rules can opt into.
    pub fn with_channel(mut self, id: impl Into<String>, channel: Box<dyn Notifier>) -> Self {
        self.channels.insert(id.into(), channel);
        self
    }

    pub fn default_channel(&self) -> &dyn Notifier {
        self.default_channel.as_ref()
    }

    /// Channels an alert for `requested` ids goes to. Unknown ids are ignored.
    fn route(&self, requested: &[String]) -> Vec<&dyn Notifier> {
        let mut selected: Vec<&dyn Notifier> = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for id in requested {
            let id = id.trim();
            if seen.contains(&id) {
                continue;
            }
            if let Some(channel) = self.channels.get(id) {
                seen.push(id);
                selected.push(channel.as_ref());
            } else {
                tracing::debug!(channel = id, "Unregistered notify channel ignored");
            }
        }
        if selected.is_empty() {
            selected.push(self.default_channel.as_ref());
        }
        selected
    }

    /// Deliver one alert to every channel selected by `requested`.
    ///
    /// Returns one result per channel delivery.
    pub async fn dispatch(
        &self,
        requested: &[String],
        subject: &str,
        message: &str,
    ) -> Vec<DispatchResult> {
        let channels = self.route(requested);
        let mut results = Vec::with_capacity(channels.len());

        for channel in channels {
            let start = std::time::Instant::now();
            let result = channel.notify(subject, message).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::debug!(
                        subject,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        subject,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                subject: subject.to_string(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}
