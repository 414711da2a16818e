//! Notifier selection from configuration.

use crate::log::LogNotifier;
use crate::pushover::{PushoverCredentials, PushoverNotifier};
use crate::traits::{Notifier, NotifyError};

#[derive(Debug, Clone, Default)]
pub struct NotifierOptions {
    /// `"pushover"` (also the empty default) or `"log"`.
    pub kind: String,
    pub pushover: PushoverCredentials,
}

/// Build the notifier named by `options.kind`.
pub fn build(options: &NotifierOptions) -> Result<Box<dyn Notifier>, NotifyError> {
    match options.kind.trim().to_ascii_lowercase().as_str() {
        "" | "pushover" => Ok(Box::new(PushoverNotifier::new(options.pushover.clone())?)),
        "log" => Ok(Box::new(LogNotifier::new())),
        other => Err(NotifyError::Config(format!(
            "unknown notifier kind {other:?}"
        ))),
    }
}
