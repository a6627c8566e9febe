use crate::core::config::Settings;
use crate::core::errors::ExporterError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
use crate::core::traits::MetricSource;
use crate::core::types::{MetricSnapshot, RateRecord};
use crate::exchanges::kraken::conversions;
use crate::exchanges::kraken::rest::KrakenRestClient;
use crate::exchanges::kraken::EXCHANGE_NAME;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Kraken exchange-rate collector.
///
/// Holds the trade-symbol allowlist and the rates from the most recent
/// successful fetch. Symbol discovery runs once at construction when no
/// allowlist is configured; if discovery fails the allowlist stays empty
/// and every subsequent cycle fetches nothing.
pub struct KrakenCollector<R: RestClient> {
    rest: KrakenRestClient<R>,
    symbols: Vec<String>,
    rates: Vec<RateRecord>,
}

impl KrakenCollector<ReqwestRest> {
    /// Build a collector from settings and run its first fetch cycle.
    pub async fn from_settings(settings: &Settings) -> Result<Self, ExporterError> {
        let config = RestClientConfig::new(settings.url.clone(), EXCHANGE_NAME.to_string())
            .with_timeout(settings.timeout);
        let rest = RestClientBuilder::new(config).build()?;
        Ok(Self::new(rest, settings.trade_symbols.clone()).await)
    }
}

impl<R: RestClient> KrakenCollector<R> {
    /// Construct the collector and perform one rate-fetch cycle, including
    /// symbol discovery when `symbols` is empty.
    pub async fn new(rest: R, symbols: Vec<String>) -> Self {
        let mut collector = Self {
            rest: KrakenRestClient::new(rest),
            symbols,
            rates: Vec::new(),
        };
        if collector.symbols.is_empty() {
            collector.discover_symbols().await;
        }
        collector.fetch_rates().await;
        collector
    }

    /// The currently allowed pair symbols.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// The rates from the most recent successful fetch.
    pub fn rates(&self) -> &[RateRecord] {
        &self.rates
    }

    /// One call, at start: fill the allowlist from the exchange's asset
    /// pairs, skipping dark-pool pairs. Failure leaves the allowlist empty.
    async fn discover_symbols(&mut self) {
        match self.rest.asset_pairs().await {
            Ok(pairs) => {
                for pair in pairs.values() {
                    if conversions::is_tradable_altname(&pair.altname) {
                        self.symbols.push(pair.altname.to_uppercase());
                    }
                }
                debug!(symbols = ?self.symbols, "discovered trade symbols");
            }
            Err(e) => {
                warn!("could not retrieve symbols: {}", e);
            }
        }
    }

    /// One ticker request for the whole allowlist. A successful, parseable
    /// response replaces the stored rates wholesale; any failure leaves the
    /// previous rates untouched.
    async fn fetch_rates(&mut self) {
        if self.symbols.is_empty() {
            return;
        }
        let pairs = self.symbols.join(",");
        debug!(pairs = %pairs, "fetching ticker data");

        let tickers = match self.rest.ticker(&pairs).await {
            Ok(tickers) => tickers,
            Err(e) => {
                warn!("could not retrieve ticker data: {}", e);
                return;
            }
        };

        let result: Vec<RateRecord> = tickers
            .iter()
            .filter_map(|(code, ticker)| conversions::convert_ticker(code, ticker))
            .collect();

        debug!(rates = result.len(), "fetched ticker rates");
        if !result.is_empty() {
            self.rates = result;
        }
    }
}

#[async_trait]
impl<R: RestClient> MetricSource for KrakenCollector<R> {
    fn exchange(&self) -> &'static str {
        EXCHANGE_NAME
    }

    async fn refresh(&mut self) {
        self.fetch_rates().await;
    }

    fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot::rates_only(EXCHANGE_NAME, self.rates.clone())
    }
}
