//! Minimal YNAB API client used by the alerts daemon.
//!
//! This crate provides:
//! - `YnabClient` for the budgets and accounts endpoints
//! - Response types with currency formatting for display
//! - `BalanceSource` trait the daemon polls for account balances

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::{YnabClient, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use source::BalanceSource;
pub use types::{balance_map, format_plain, Account, Budget, BudgetDetail, CurrencyFormat};
