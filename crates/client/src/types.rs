//! YNAB response types.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Milli-units: 1000 = one currency unit.
    pub balance: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub on_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
}

/// Budget metadata returned by `/budgets/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BudgetDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub iso_code: String,
    pub example_format: String,
    pub decimal_digits: u32,
    pub decimal_separator: String,
    pub symbol_first: bool,
    pub group_separator: String,
    pub currency_symbol: String,
    pub display_symbol: bool,
}

impl CurrencyFormat {
    /// Symbol shown next to amounts, falling back to the ISO code.
    pub fn label(&self) -> &str {
        if self.display_symbol && !self.currency_symbol.is_empty() {
            &self.currency_symbol
        } else {
            &self.iso_code
        }
    }

    /// Render a milli-unit amount, e.g. `-$12.50` or `12.50 kr`.
    ///
    /// Separators are not applied; the decimal point is always `.`.
    pub fn format(&self, milli: i64) -> String {
        let amount = format_plain(milli, self.decimal_digits);
        if !self.display_symbol || self.currency_symbol.is_empty() {
            return amount;
        }
        if self.symbol_first {
            match amount.strip_prefix('-') {
                Some(abs) => format!("-{}{abs}", self.currency_symbol),
                None => format!("{}{amount}", self.currency_symbol),
            }
        } else {
            format!("{amount} {}", self.currency_symbol)
        }
    }
}

/// Format milli-units without a currency symbol. Zero `decimal_digits`
/// means the default of two.
pub fn format_plain(milli: i64, decimal_digits: u32) -> String {
    let digits = if decimal_digits == 0 { 2 } else { decimal_digits as usize };
    let sign = if milli < 0 { "-" } else { "" };
    let value = milli.unsigned_abs() as f64 / 1000.0;
    format!("{sign}{value:.digits$}")
}

/// Map account name to balance. Later duplicates win.
pub fn balance_map(accounts: &[Account]) -> HashMap<String, i64> {
    accounts
        .iter()
        .map(|a| (a.name.clone(), a.balance))
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsData {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetsData {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetData {
    pub budget: BudgetDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> CurrencyFormat {
        CurrencyFormat {
            iso_code: "USD".into(),
            currency_symbol: "$".into(),
            symbol_first: true,
            display_symbol: true,
            decimal_digits: 2,
            ..Default::default()
        }
    }

    #[test]
    fn decodes_accounts_envelope() {
        let body = r#"{"data":{"accounts":[
            {"id":"a1","name":"Checking","balance":125000,"type":"checking","on_budget":true,"closed":false},
            {"id":"a2","name":"Visa","balance":-40500,"type":"creditCard","on_budget":true}
        ],"server_knowledge":7}}"#;
        let env: Envelope<AccountsData> = serde_json::from_str(body).unwrap();
        let accounts = env.data.accounts;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].kind, "checking");
        assert_eq!(accounts[1].balance, -40_500);

        let map = balance_map(&accounts);
        assert_eq!(map["Checking"], 125_000);
        assert_eq!(map["Visa"], -40_500);
    }

    #[test]
    fn decodes_budget_with_and_without_currency_format() {
        let body = r#"{"data":{"budgets":[
            {"id":"b1","name":"Home","currency_format":{"iso_code":"EUR","currency_symbol":"€","display_symbol":true,"symbol_first":false,"decimal_digits":2}},
            {"id":"b2","name":"Bare"}
        ]}}"#;
        let env: Envelope<BudgetsData> = serde_json::from_str(body).unwrap();
        let budgets = env.data.budgets;
        assert_eq!(budgets[0].currency_format.as_ref().unwrap().label(), "€");
        assert!(budgets[1].currency_format.is_none());
    }

    #[test]
    fn label_falls_back_to_iso_code() {
        let mut fmt = usd();
        fmt.display_symbol = false;
        assert_eq!(fmt.label(), "USD");
        fmt.display_symbol = true;
        fmt.currency_symbol.clear();
        assert_eq!(fmt.label(), "USD");
    }

    #[test]
    fn format_plain_defaults_to_two_digits() {
        assert_eq!(format_plain(12_340, 0), "12.34");
        assert_eq!(format_plain(-500, 2), "-0.50");
        assert_eq!(format_plain(1_000, 3), "1.000");
        assert_eq!(format_plain(0, 0), "0.00");
    }

    #[test]
    fn format_places_symbol() {
        let fmt = usd();
        assert_eq!(fmt.format(12_500), "$12.50");
        assert_eq!(fmt.format(-12_500), "-$12.50");

        let sek = CurrencyFormat {
            iso_code: "SEK".into(),
            currency_symbol: "kr".into(),
            display_symbol: true,
            ..Default::default()
        };
        assert_eq!(sek.format(99_000), "99.00 kr");

        let hidden = CurrencyFormat {
            display_symbol: false,
            ..usd()
        };
        assert_eq!(hidden.format(1_000), "1.00");
    }
}
