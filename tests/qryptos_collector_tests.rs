use crypto_exporters::core::kernel::{QuoineJwtSigner, ReqwestRest};
use crypto_exporters::core::traits::MetricSource;
use crypto_exporters::core::types::AccountType;
use crypto_exporters::exchanges::qryptos::rest::{Capabilities, QryptosRestClient};
use crypto_exporters::exchanges::qryptos::{QryptosCollector, TickerStrategy};
use mockito::{Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

const PRODUCTS_BODY: &str = r#"[
    {"currency_pair_code":"BTCUSD","base_currency":"BTC","quoted_currency":"USD","last_traded_price":"100.5"},
    {"currency_pair_code":"ETHUSD","base_currency":"ETH","quoted_currency":"USD","last_traded_price":null}
]"#;

fn client_for(server: &ServerGuard, capabilities: Capabilities) -> QryptosRestClient<ReqwestRest> {
    let rest = ReqwestRest::new(server.url(), "qryptos".to_string(), None).unwrap();
    QryptosRestClient::new(rest).with_capabilities(capabilities)
}

fn signed_client_for(server: &ServerGuard) -> QryptosRestClient<ReqwestRest> {
    let signer = Arc::new(QuoineJwtSigner::new("key".to_string(), "secret".to_string()));
    let rest = ReqwestRest::new(server.url(), "qryptos".to_string(), Some(signer)).unwrap();
    QryptosRestClient::new(rest)
}

#[tokio::test]
async fn bulk_strategy_reads_rates_from_the_product_list() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body(PRODUCTS_BODY)
        .create_async()
        .await;

    let collector =
        QryptosCollector::with_pacing(client_for(&server, Capabilities::default()), false, Duration::ZERO)
            .await;

    assert_eq!(collector.strategy(), TickerStrategy::BulkTicker);
    // ETHUSD has no last price and is skipped.
    assert_eq!(collector.rates().len(), 1);
    let record = &collector.rates()["BTC/USD"];
    assert_eq!(record.source_currency, "BTC");
    assert_eq!(record.target_currency, "USD");
    assert!((record.value - 100.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn per_symbol_strategy_fetches_each_known_symbol() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body(PRODUCTS_BODY)
        .create_async()
        .await;
    let btc = server
        .mock("GET", "/products/code/CASH/BTCUSD")
        .with_body(r#"{"currency_pair_code":"BTCUSD","base_currency":"BTC","quoted_currency":"USD","last_traded_price":"101.0"}"#)
        .create_async()
        .await;
    let eth = server
        .mock("GET", "/products/code/CASH/ETHUSD")
        .with_status(503)
        .create_async()
        .await;

    let capabilities = Capabilities {
        fetch_tickers: false,
        fetch_currencies: true,
    };
    let collector =
        QryptosCollector::with_pacing(client_for(&server, capabilities), false, Duration::ZERO)
            .await;

    btc.assert_async().await;
    eth.assert_async().await;
    assert_eq!(collector.strategy(), TickerStrategy::PerSymbolViaCurrencies);
    // The failing symbol is skipped; the cycle continues.
    assert_eq!(collector.rates().len(), 1);
    assert!((collector.rates()["BTC/USD"].value - 101.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn market_list_is_cached_across_cycles() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;
    let markets = server
        .mock("GET", "/markets")
        .with_body(r#"[{"currency_pair_code":"BTCUSD","base_currency":"BTC","quoted_currency":"USD"}]"#)
        .expect(1)
        .create_async()
        .await;
    let ticker = server
        .mock("GET", "/products/code/CASH/BTCUSD")
        .with_body(r#"{"currency_pair_code":"BTCUSD","base_currency":"BTC","quoted_currency":"USD","last_traded_price":"99.0"}"#)
        .expect(2)
        .create_async()
        .await;

    let capabilities = Capabilities {
        fetch_tickers: false,
        fetch_currencies: false,
    };
    let mut collector =
        QryptosCollector::with_pacing(client_for(&server, capabilities), false, Duration::ZERO)
            .await;
    assert_eq!(collector.strategy(), TickerStrategy::PerSymbolViaMarkets);

    collector.refresh().await;

    markets.assert_async().await;
    ticker.assert_async().await;
    assert_eq!(collector.rates().len(), 1);
}

#[tokio::test]
async fn market_load_retries_until_the_exchange_recovers() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("GET", "/products")
        .with_body(PRODUCTS_BODY)
        .create_async()
        .await;
    let unavailable = server
        .mock("GET", "/products")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server, Capabilities::default());
    let handle = tokio::spawn(async move {
        QryptosCollector::with_pacing(client, false, Duration::from_millis(20)).await
    });

    // Let the retry loop hit the outage a few times, then lift it.
    tokio::time::sleep(Duration::from_millis(100)).await;
    unavailable.remove_async().await;

    let collector = handle.await.unwrap();
    assert_eq!(collector.rates().len(), 1);
}

#[tokio::test]
async fn non_retryable_market_error_aborts_the_cycle() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_status(404)
        .create_async()
        .await;

    let collector =
        QryptosCollector::with_pacing(client_for(&server, Capabilities::default()), false, Duration::ZERO)
            .await;
    assert!(collector.rates().is_empty());
}

#[tokio::test]
async fn balances_require_credentials() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body("[]")
        .create_async()
        .await;
    let balance = server
        .mock("GET", "/accounts/balance")
        .expect(0)
        .create_async()
        .await;

    let collector =
        QryptosCollector::with_pacing(client_for(&server, Capabilities::default()), false, Duration::ZERO)
            .await;

    balance.assert_async().await;
    let snapshot = collector.snapshot();
    assert_eq!(snapshot.balances, Some(Vec::new()));
}

#[tokio::test]
async fn only_positive_balances_are_exposed() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body("[]")
        .create_async()
        .await;
    let balance = server
        .mock("GET", "/accounts/balance")
        .match_header("x-quoine-api-version", "2")
        .with_body(r#"[{"currency":"BTC","balance":"0","reserved_balance":"5"}]"#)
        .create_async()
        .await;

    let collector =
        QryptosCollector::with_pacing(signed_client_for(&server), true, Duration::ZERO).await;

    balance.assert_async().await;
    let snapshot = collector.snapshot();
    let balances = snapshot.balances.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].currency, "BTC");
    assert_eq!(balances[0].account, AccountType::Used);
    assert!((balances[0].amount - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn balance_failure_keeps_previous_state() {
    let mut server = Server::new_async().await;
    let _products = server
        .mock("GET", "/products")
        .with_body("[]")
        .create_async()
        .await;
    let _balance = server
        .mock("GET", "/accounts/balance")
        .with_body(r#"[{"currency":"BTC","balance":"2","reserved_balance":"0"}]"#)
        .create_async()
        .await;

    let mut collector =
        QryptosCollector::with_pacing(signed_client_for(&server), true, Duration::ZERO).await;
    assert_eq!(collector.snapshot().balances.unwrap().len(), 1);

    let _broken = server
        .mock("GET", "/accounts/balance")
        .with_status(503)
        .create_async()
        .await;

    collector.refresh().await;
    let balances = collector.snapshot().balances.unwrap();
    assert_eq!(balances.len(), 1);
    assert!((balances[0].amount - 2.0).abs() < f64::EPSILON);
}
