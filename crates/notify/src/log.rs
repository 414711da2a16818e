//! Notifier that writes alerts to the log.

use crate::traits::{Notifier, NotifyError};

#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn line(subject: &str, message: &str) -> String {
        format!("[alert] {subject}: {message}")
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!("{}", Self::line(subject, message));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_line_format() {
        assert_eq!(
            LogNotifier::line("checking-low", "Rule checking-low triggered: x < 1"),
            "[alert] checking-low: Rule checking-low triggered: x < 1"
        );
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        let notifier = LogNotifier::new();
        assert!(notifier.notify("s", "m").await.is_ok());
        assert_eq!(notifier.channel_name(), "log");
    }
}
