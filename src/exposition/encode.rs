use crate::core::errors::ExporterError;
use crate::core::types::MetricSnapshot;
use prometheus::{GaugeVec, Opts, Registry, TextEncoder};

/// Render one snapshot to Prometheus text exposition format.
///
/// A fresh registry per render keeps the output a pure function of the
/// snapshot: gauges from earlier cycles cannot linger.
pub fn encode_snapshot(snapshot: &MetricSnapshot) -> Result<String, ExporterError> {
    let registry = Registry::new();

    let rates = GaugeVec::new(
        Opts::new("exchange_rate", "Current exchange rates"),
        &["source_currency", "target_currency", "exchange"],
    )?;
    registry.register(Box::new(rates.clone()))?;
    for rate in &snapshot.rates {
        rates
            .with_label_values(&[
                &rate.source_currency,
                &rate.target_currency,
                snapshot.exchange,
            ])
            .set(rate.value);
    }

    if let Some(balances) = &snapshot.balances {
        let balance = GaugeVec::new(
            Opts::new("account_balance", "Account Balance"),
            &["source_currency", "currency", "account", "type"],
        )?;
        registry.register(Box::new(balance.clone()))?;
        for entry in balances {
            balance
                .with_label_values(&[
                    &entry.currency,
                    &entry.currency,
                    entry.account.as_str(),
                    snapshot.exchange,
                ])
                .set(entry.amount);
        }
    }

    let encoder = TextEncoder::new();
    Ok(encoder.encode_to_string(&registry.gather())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AccountType, BalanceRecord, MetricSnapshot, RateRecord};

    fn sample_lines(output: &str, family: &str) -> Vec<String> {
        output
            .lines()
            .filter(|l| l.starts_with(family) && !l.starts_with('#'))
            .map(String::from)
            .collect()
    }

    #[test]
    fn one_sample_line_per_rate_with_exchange_label() {
        let snapshot = MetricSnapshot::rates_only(
            "kraken",
            vec![
                RateRecord::new("BTC", "USD", 50000.0),
                RateRecord::new("ETH", "EUR", 2000.5),
            ],
        );
        let output = encode_snapshot(&snapshot).unwrap();
        let lines = sample_lines(&output, "exchange_rate");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains(r#"exchange="kraken""#)));
        assert!(lines
            .iter()
            .any(|l| l.contains(r#"source_currency="BTC""#)
                && l.contains(r#"target_currency="USD""#)
                && l.ends_with("50000")));
    }

    #[test]
    fn rates_only_snapshot_has_no_balance_family() {
        let snapshot =
            MetricSnapshot::rates_only("kraken", vec![RateRecord::new("BTC", "USD", 1.0)]);
        let output = encode_snapshot(&snapshot).unwrap();
        assert!(!output.contains("account_balance"));
    }

    #[test]
    fn balance_samples_carry_doubled_currency_labels() {
        let snapshot = MetricSnapshot {
            exchange: "qryptos",
            rates: Vec::new(),
            balances: Some(vec![BalanceRecord::new("BTC", AccountType::Used, 5.0)]),
        };
        let output = encode_snapshot(&snapshot).unwrap();
        let lines = sample_lines(&output, "account_balance");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(r#"source_currency="BTC""#));
        assert!(lines[0].contains(r#"currency="BTC""#));
        assert!(lines[0].contains(r#"account="used""#));
        assert!(lines[0].contains(r#"type="qryptos""#));
    }

    #[test]
    fn empty_balance_family_emits_no_samples() {
        let snapshot = MetricSnapshot {
            exchange: "qryptos",
            rates: Vec::new(),
            balances: Some(Vec::new()),
        };
        let output = encode_snapshot(&snapshot).unwrap();
        assert!(sample_lines(&output, "account_balance").is_empty());
    }
}
