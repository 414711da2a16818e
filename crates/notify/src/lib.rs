//! Alert delivery for triggered balance rules.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Log and Pushover notifier implementations
//! - `build` to select a notifier from configuration
//! - Dispatcher that routes alerts to the channels a rule names

pub mod build;
pub mod dispatcher;
pub mod log;
pub mod pushover;
pub mod traits;

pub use build::{build, NotifierOptions};
pub use dispatcher::Dispatcher;
pub use log::LogNotifier;
pub use pushover::{PushoverCredentials, PushoverNotifier, PUSHOVER_API_URL};
pub use traits::{DispatchResult, Notifier, NotifyError};
