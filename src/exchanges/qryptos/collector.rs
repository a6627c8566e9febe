use crate::core::config::Settings;
use crate::core::errors::ExporterError;
use crate::core::kernel::{QuoineJwtSigner, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::core::traits::MetricSource;
use crate::core::types::{BalanceRecord, MetricSnapshot, RateRecord};
use crate::exchanges::qryptos::conversions;
use crate::exchanges::qryptos::rest::{Capabilities, QryptosRestClient};
use crate::exchanges::qryptos::types::QryptosProduct;
use crate::exchanges::qryptos::EXCHANGE_NAME;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Fixed pacing for the market-load retry loop and the per-symbol fetch
/// pause.
const RATE_LIMIT_PACING: Duration = Duration::from_secs(1);

/// How tickers are retrieved, decided once from the client's declared
/// capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerStrategy {
    /// One request covers every market.
    BulkTicker,
    /// One request per symbol known from the market load.
    PerSymbolViaCurrencies,
    /// One request per market from a separately fetched, cached market
    /// list.
    PerSymbolViaMarkets,
}

impl TickerStrategy {
    pub fn select(capabilities: Capabilities) -> Self {
        if capabilities.fetch_tickers {
            Self::BulkTicker
        } else if capabilities.fetch_currencies {
            Self::PerSymbolViaCurrencies
        } else {
            Self::PerSymbolViaMarkets
        }
    }
}

/// Qryptos exchange-rate and balance collector.
///
/// Rates are keyed by their `BASE/QUOTE` symbol, so a repeated symbol
/// within a cycle overwrites rather than duplicates. Balance state exists
/// only when API credentials are configured.
pub struct QryptosCollector<R: RestClient> {
    rest: QryptosRestClient<R>,
    strategy: TickerStrategy,
    has_credentials: bool,
    rates: BTreeMap<String, RateRecord>,
    balances: Vec<BalanceRecord>,
    market_cache: Option<Vec<QryptosProduct>>,
    pacing: Duration,
}

impl QryptosCollector<ReqwestRest> {
    /// Build a collector from settings and run its first fetch cycle.
    pub async fn from_settings(settings: &Settings) -> Result<Self, ExporterError> {
        let config = RestClientConfig::new(settings.url.clone(), EXCHANGE_NAME.to_string())
            .with_timeout(settings.timeout);
        let mut builder = RestClientBuilder::new(config);
        if let (Some(key), Some(secret)) = (settings.api_key(), settings.api_secret()) {
            builder = builder.with_signer(Arc::new(QuoineJwtSigner::new(
                key.to_string(),
                secret.to_string(),
            )));
        }
        let rest = QryptosRestClient::new(builder.build()?);
        Ok(Self::new(rest, settings.has_credentials()).await)
    }
}

impl<R: RestClient> QryptosCollector<R> {
    /// Construct the collector and perform one full fetch cycle.
    pub async fn new(rest: QryptosRestClient<R>, has_credentials: bool) -> Self {
        Self::with_pacing(rest, has_credentials, RATE_LIMIT_PACING).await
    }

    /// Same as [`Self::new`] with an explicit pacing interval for the retry
    /// loop and per-symbol pauses.
    pub async fn with_pacing(
        rest: QryptosRestClient<R>,
        has_credentials: bool,
        pacing: Duration,
    ) -> Self {
        let strategy = TickerStrategy::select(rest.capabilities());
        let mut collector = Self {
            rest,
            strategy,
            has_credentials,
            rates: BTreeMap::new(),
            balances: Vec::new(),
            market_cache: None,
            pacing,
        };
        collector.run_cycle().await;
        collector
    }

    pub fn strategy(&self) -> TickerStrategy {
        self.strategy
    }

    /// The rates from the most recent successful fetches, keyed by symbol.
    pub fn rates(&self) -> &BTreeMap<String, RateRecord> {
        &self.rates
    }

    async fn run_cycle(&mut self) {
        self.fetch_tickers().await;
        self.fetch_balances().await;
    }

    /// Load market metadata, retrying indefinitely while the exchange is
    /// unavailable or timing out. Any other failure propagates and aborts
    /// the cycle.
    async fn load_markets(&self) -> Result<Vec<QryptosProduct>, ExporterError> {
        debug!("loading markets");
        let pacing = FixedInterval::new(self.pacing);
        RetryIf::spawn(
            pacing,
            || self.rest.products(),
            |e: &ExporterError| {
                let retry = e.is_retryable();
                if retry {
                    warn!("market load failed, retrying: {}", e);
                }
                retry
            },
        )
        .await
    }

    async fn fetch_tickers(&mut self) {
        let products = match self.load_markets().await {
            Ok(products) => products,
            Err(e) => {
                warn!("could not load markets: {}", e);
                return;
            }
        };

        match self.strategy {
            TickerStrategy::BulkTicker => {
                debug!("loading tickers");
                for product in &products {
                    self.store_ticker(
                        &conversions::product_symbol(product),
                        product.last_traded_price.as_deref(),
                    );
                }
            }
            TickerStrategy::PerSymbolViaCurrencies => {
                for product in &products {
                    self.fetch_single_ticker(product).await;
                }
            }
            TickerStrategy::PerSymbolViaMarkets => {
                if self.market_cache.is_none() {
                    debug!("fetching markets");
                    match self.rest.markets().await {
                        Ok(markets) => self.market_cache = Some(markets),
                        Err(e) => {
                            warn!("could not fetch markets: {}", e);
                            return;
                        }
                    }
                }
                let markets = self.market_cache.clone().unwrap_or_default();
                for market in &markets {
                    self.fetch_single_ticker(market).await;
                }
            }
        }

        debug!(rates = self.rates.len(), "ticker rates after cycle");
    }

    /// One per-symbol request, followed unconditionally by the rate-limit
    /// pause. Errors are logged and the symbol skipped.
    async fn fetch_single_ticker(&mut self, product: &QryptosProduct) {
        let symbol = conversions::product_symbol(product);
        debug!(symbol = %symbol, "loading symbol");
        match self.rest.product_by_code(&product.currency_pair_code).await {
            Ok(ticker) => {
                self.store_ticker(&symbol, ticker.last_traded_price.as_deref());
            }
            Err(e) => {
                warn!(symbol = %symbol, "could not fetch ticker: {}", e);
            }
        }
        tokio::time::sleep(self.pacing).await;
    }

    fn store_ticker(&mut self, symbol: &str, last: Option<&str>) {
        if let Some(record) = conversions::convert_ticker(symbol, last) {
            self.rates.insert(symbol.to_string(), record);
        }
    }

    /// Rebuild balance state from the account endpoint. Skipped entirely
    /// without credentials; failures keep the previous state.
    async fn fetch_balances(&mut self) {
        if !self.has_credentials {
            return;
        }
        match self.rest.balance().await {
            Ok(accounts) => {
                self.balances = conversions::balance_records(&accounts);
                debug!(entries = self.balances.len(), "rebuilt balance state");
            }
            Err(e) => {
                warn!("could not fetch balances: {}", e);
            }
        }
    }
}

#[async_trait]
impl<R: RestClient> MetricSource for QryptosCollector<R> {
    fn exchange(&self) -> &'static str {
        EXCHANGE_NAME
    }

    async fn refresh(&mut self) {
        self.run_cycle().await;
    }

    fn snapshot(&self) -> MetricSnapshot {
        let balances = if self.has_credentials {
            self.balances
                .iter()
                .filter(|b| b.amount > 0.0)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        MetricSnapshot {
            exchange: EXCHANGE_NAME,
            rates: self.rates.values().cloned().collect(),
            balances: Some(balances),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_selection_follows_capability_priority() {
        let caps = Capabilities {
            fetch_tickers: true,
            fetch_currencies: true,
        };
        assert_eq!(TickerStrategy::select(caps), TickerStrategy::BulkTicker);

        let caps = Capabilities {
            fetch_tickers: false,
            fetch_currencies: true,
        };
        assert_eq!(
            TickerStrategy::select(caps),
            TickerStrategy::PerSymbolViaCurrencies
        );

        let caps = Capabilities {
            fetch_tickers: false,
            fetch_currencies: false,
        };
        assert_eq!(
            TickerStrategy::select(caps),
            TickerStrategy::PerSymbolViaMarkets
        );
    }
}
