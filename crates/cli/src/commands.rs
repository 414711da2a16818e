//! One-shot subcommands: budget/account listings and rule lint.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use tracing::warn;

use ynab_client::{format_plain, Account, Budget, CurrencyFormat, YnabClient};
use ynab_core::{Config, ConfigError};
use ynab_rules::{lint_dir, LintResult};

fn client_for(config: &Config) -> Result<YnabClient> {
    if config.api_token.is_empty() {
        return Err(ConfigError::Missing("YNAB_TOKEN").into());
    }
    YnabClient::new(config.api_token.clone(), &config.base_url).context("failed to build YNAB client")
}

pub async fn list_budgets(config: &Config) -> Result<()> {
    let client = client_for(config)?;
    let budgets = client.get_budgets().await.context("failed to list budgets")?;
    for budget in &budgets {
        println!("{}", budget_line(budget));
    }
    Ok(())
}

/// `budget` overrides the configured budget id.
pub async fn list_accounts(config: &Config, budget: Option<&str>) -> Result<()> {
    let budget_id = budget
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(&config.budget_id);
    if budget_id.is_empty() {
        return Err(ConfigError::Missing("YNAB_BUDGET_ID").into());
    }

    let client = client_for(config)?;
    let detail = match client.get_budget(budget_id).await {
        Ok(detail) => Some(detail),
        Err(e) => {
            warn!(budget = budget_id, error = %e, "could not fetch budget metadata");
            None
        }
    };
    let accounts = client
        .get_accounts(budget_id)
        .await
        .with_context(|| format!("failed to list accounts for budget {budget_id}"))?;

    match &detail {
        Some(detail) => println!("Budget: {} ({})", detail.name, detail.id),
        None => println!("Budget: {budget_id}"),
    }
    let currency = detail.as_ref().and_then(|d| d.currency_format.as_ref());
    for account in &accounts {
        println!("{}", account_line(account, currency));
    }
    Ok(())
}

pub fn lint(config: &Config) -> Result<()> {
    let now = chrono::Local::now().fixed_offset();
    let results = lint_dir(&config.rules_dir, &now, config.poll_interval)
        .with_context(|| format!("failed to load rules from {}", config.rules_dir.display()))?;
    print!("{}", render_lint(&results));
    Ok(())
}

fn budget_line(budget: &Budget) -> String {
    let label = budget
        .currency_format
        .as_ref()
        .map(CurrencyFormat::label)
        .unwrap_or_default();
    format!("{}\t{}\t{}", budget.id, budget.name, label)
}

fn account_line(account: &Account, currency: Option<&CurrencyFormat>) -> String {
    let amount = match currency {
        Some(fmt) => fmt.format(account.balance),
        None => format_plain(account.balance, 0),
    };
    format!("{}\t{}\t{}", account.id, account.name, amount)
}

fn render_lint(results: &[LintResult]) -> String {
    let mut out = String::new();
    for result in results {
        let next = result
            .next_eval
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(out, "{}:", result.name);
        let _ = writeln!(out, "  next: {next}");
        if result.issues.is_empty() {
            let _ = writeln!(out, "  issues: none");
        } else {
            let _ = writeln!(out, "  issues:");
            for issue in &result.issues {
                let _ = writeln!(out, "    - {issue}");
            }
        }
    }
    out
}
