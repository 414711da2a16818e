//! Balance data source seam between the daemon and the YNAB API.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::client::YnabClient;
use crate::error::ClientError;
use crate::types::balance_map;

/// Supplies the current account balances, keyed by account name, in
/// milli-units.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn current_balances(&self, budget_id: &str) -> Result<HashMap<String, i64>, ClientError>;
}

#[async_trait]
impl BalanceSource for YnabClient {
    async fn current_balances(&self, budget_id: &str) -> Result<HashMap<String, i64>, ClientError> {
        let accounts = self.get_accounts(budget_id).await?;
        Ok(balance_map(&accounts))
    }
}
