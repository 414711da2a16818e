//! HTTP client for the subset of the YNAB API the daemon needs.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::types::{Account, AccountsData, Budget, BudgetData, BudgetDetail, BudgetsData, Envelope};

pub const DEFAULT_BASE_URL: &str = "https://api.ynab.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct YnabClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl YnabClient {
    /// An empty `base_url` selects [`DEFAULT_BASE_URL`].
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self, ClientError> {
        let base_url = match base_url.trim_end_matches('/') {
            "" => DEFAULT_BASE_URL.to_string(),
            url => url.to_string(),
        };
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_accounts(&self, budget_id: &str) -> Result<Vec<Account>, ClientError> {
        let path = format!("/budgets/{budget_id}/accounts");
        let data: AccountsData = self.get("accounts", &path).await?;
        Ok(data.accounts)
    }

    pub async fn get_budgets(&self) -> Result<Vec<Budget>, ClientError> {
        let data: BudgetsData = self.get("budgets", "/budgets").await?;
        Ok(data.budgets)
    }

    pub async fn get_budget(&self, budget_id: &str) -> Result<BudgetDetail, ClientError> {
        let path = format!("/budgets/{budget_id}");
        let data: BudgetData = self.get("budget", &path).await?;
        Ok(data.budget)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "ynab request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { endpoint, status });
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}
