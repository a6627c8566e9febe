use serde::Deserialize;

/// One product (market) as returned by `/products` and `/markets`.
///
/// Prices arrive as decimal strings; `last_traded_price` is null for
/// markets that have never traded.
#[derive(Debug, Clone, Deserialize)]
pub struct QryptosProduct {
    pub currency_pair_code: String,
    pub base_currency: String,
    pub quoted_currency: String,
    #[serde(default)]
    pub last_traded_price: Option<String>,
}

/// One entry of the authenticated `/accounts/balance` response.
#[derive(Debug, Clone, Deserialize)]
pub struct QryptosAccountBalance {
    pub currency: String,
    pub balance: String,
    #[serde(default)]
    pub reserved_balance: Option<String>,
}
