use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ynab_core::ConfigOverrides;

/// Balance alerts for YNAB budgets.
///
/// Polls account balances, evaluates the YAML rules in the rules directory
/// and sends a notification for every rule that fires. Flags override
/// environment variables, which override the config file.
#[derive(Parser, Debug)]
#[command(name = "ynab-alerts", version, about = "Balance alerts for YNAB budgets")]
pub struct CliArgs {
    /// YNAB personal access token
    #[arg(long)]
    pub token: Option<String>,

    /// Budget to watch
    #[arg(long)]
    pub budget: Option<String>,

    /// YNAB API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory holding rule files (*.yml, *.yaml)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Notifier: pushover or log
    #[arg(long)]
    pub notifier: Option<String>,

    /// Poll interval, e.g. 30m or 1h30m
    #[arg(long)]
    pub poll: Option<String>,

    /// Observation store file
    #[arg(long)]
    pub observe_path: Option<PathBuf>,

    /// Trace rule evaluation step by step
    #[arg(long)]
    pub debug: bool,

    /// YAML or JSON config file
    #[arg(long, env = "YNAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip evaluation before this time of day (HH:MM)
    #[arg(long)]
    pub day_start: Option<String>,

    /// Skip evaluation from this time of day on (HH:MM)
    #[arg(long)]
    pub day_end: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the alert daemon (default)
    Run,
    /// Print budget ids, names and currency
    ListBudgets,
    /// Print the accounts and balances of a budget
    ListAccounts {
        /// Budget to list; defaults to the configured budget
        #[arg(long)]
        budget: Option<String>,
    },
    /// Check rule files and estimate when each rule is next evaluated
    Lint,
}

impl CliArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            token: self.token.clone(),
            budget_id: self.budget.clone(),
            base_url: self.base_url.clone(),
            rules_dir: self.rules.clone(),
            notifier: self.notifier.clone(),
            poll_interval: self.poll.clone(),
            observe_path: self.observe_path.clone(),
            debug: self.debug.then_some(true),
            day_start: self.day_start.clone(),
            day_end: self.day_end.clone(),
        }
    }
}
