use serde::{Deserialize, Serialize};
use std::fmt;

/// One currency-pair exchange rate snapshot.
///
/// Recomputed every poll cycle; no history is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub source_currency: String,
    pub target_currency: String,
    pub value: f64,
}

impl RateRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source_currency: source.into(),
            target_currency: target.into(),
            value,
        }
    }
}

/// Which side of an account a balance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Free,
    Used,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Used => "used",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One account balance entry for a single currency and account side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub currency: String,
    pub account: AccountType,
    pub amount: f64,
}

impl BalanceRecord {
    pub fn new(currency: impl Into<String>, account: AccountType, amount: f64) -> Self {
        Self {
            currency: currency.into(),
            account,
            amount,
        }
    }
}

/// The full metric set a collector exposes for one render.
///
/// `balances` is `None` for exporters that never emit an `account_balance`
/// family and `Some` (possibly empty) for those that do, so the family's
/// presence in the output is independent of whether any sample survived
/// filtering.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub exchange: &'static str,
    pub rates: Vec<RateRecord>,
    pub balances: Option<Vec<BalanceRecord>>,
}

impl MetricSnapshot {
    pub fn rates_only(exchange: &'static str, rates: Vec<RateRecord>) -> Self {
        Self {
            exchange,
            rates,
            balances: None,
        }
    }
}
