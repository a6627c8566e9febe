use crate::core::types::{AccountType, BalanceRecord, RateRecord};
use crate::exchanges::qryptos::types::{QryptosAccountBalance, QryptosProduct};
use tracing::warn;

/// Normalized symbol for a product: `BASE/QUOTE`.
pub fn product_symbol(product: &QryptosProduct) -> String {
    format!("{}/{}", product.base_currency, product.quoted_currency)
}

/// Split a `BASE/QUOTE` symbol. Symbols that are not exactly two non-empty
/// slash-separated parts are rejected.
pub fn parse_symbol(symbol: &str) -> Option<(&str, &str)> {
    let mut parts = symbol.split('/');
    let base = parts.next()?;
    let quote = parts.next()?;
    if base.is_empty() || quote.is_empty() || parts.next().is_some() {
        return None;
    }
    Some((base, quote))
}

/// Build a rate record from a symbol and its last-trade price. Malformed
/// symbols and absent or unparseable prices yield nothing.
pub fn convert_ticker(symbol: &str, last: Option<&str>) -> Option<RateRecord> {
    let (base, quote) = parse_symbol(symbol)?;
    let last = last?;
    match last.parse::<f64>() {
        Ok(value) => Some(RateRecord::new(base, quote, value)),
        Err(e) => {
            warn!(symbol, price = %last, "unparseable last price: {}", e);
            None
        }
    }
}

/// Rebuild balance state from the account response: one entry per currency
/// per account side. `balance` maps to `free`, `reserved_balance` to `used`.
/// Filtering of non-positive amounts happens at render time, not here.
pub fn balance_records(accounts: &[QryptosAccountBalance]) -> Vec<BalanceRecord> {
    let mut records = Vec::with_capacity(accounts.len() * 2);
    for account in accounts {
        match account.balance.parse::<f64>() {
            Ok(amount) => {
                records.push(BalanceRecord::new(&account.currency, AccountType::Free, amount));
            }
            Err(e) => {
                warn!(currency = %account.currency, "unparseable balance: {}", e);
            }
        }
        if let Some(reserved) = &account.reserved_balance {
            match reserved.parse::<f64>() {
                Ok(amount) => {
                    records.push(BalanceRecord::new(
                        &account.currency,
                        AccountType::Used,
                        amount,
                    ));
                }
                Err(e) => {
                    warn!(currency = %account.currency, "unparseable reserved balance: {}", e);
                }
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_symbol_with_price_becomes_a_record() {
        let record = convert_ticker("BTC/USD", Some("100.5")).unwrap();
        assert_eq!(record.source_currency, "BTC");
        assert_eq!(record.target_currency, "USD");
        assert!((record.value - 100.5).abs() < f64::EPSILON);
    }

    #[test]
    fn slashless_symbol_yields_nothing() {
        assert!(convert_ticker("INVALIDSYMBOL", Some("1.0")).is_none());
    }

    #[test]
    fn extra_separator_yields_nothing() {
        assert!(convert_ticker("BTC/USD/EUR", Some("1.0")).is_none());
        assert!(convert_ticker("BTC/", Some("1.0")).is_none());
        assert!(convert_ticker("/USD", Some("1.0")).is_none());
    }

    #[test]
    fn missing_price_yields_nothing() {
        assert!(convert_ticker("BTC/USD", None).is_none());
    }

    #[test]
    fn product_symbol_joins_base_and_quote() {
        let product = QryptosProduct {
            currency_pair_code: "BTCUSD".to_string(),
            base_currency: "BTC".to_string(),
            quoted_currency: "USD".to_string(),
            last_traded_price: None,
        };
        assert_eq!(product_symbol(&product), "BTC/USD");
    }

    #[test]
    fn balance_state_keeps_both_sides_including_zero() {
        let accounts = vec![QryptosAccountBalance {
            currency: "BTC".to_string(),
            balance: "0".to_string(),
            reserved_balance: Some("5".to_string()),
        }];
        let records = balance_records(&accounts);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].account, AccountType::Free);
        assert!((records[0].amount - 0.0).abs() < f64::EPSILON);
        assert_eq!(records[1].account, AccountType::Used);
        assert!((records[1].amount - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_amounts_are_dropped() {
        let accounts = vec![QryptosAccountBalance {
            currency: "BTC".to_string(),
            balance: "oops".to_string(),
            reserved_balance: None,
        }];
        assert!(balance_records(&accounts).is_empty());
    }
}
