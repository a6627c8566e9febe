use crate::core::errors::ExporterError;
use crate::core::kernel::RestClient;
use crate::exchanges::qryptos::types::{QryptosAccountBalance, QryptosProduct};

/// What the upstream client declares it can do. The collector picks its
/// ticker strategy from this once, at construction.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// All tickers in one request (`/products`).
    pub fetch_tickers: bool,
    /// Per-symbol ticker lookups against the symbols known from the market
    /// load.
    pub fetch_currencies: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        // The live exchange supports both; the narrower strategies exist
        // for clients that declare less.
        Self {
            fetch_tickers: true,
            fetch_currencies: true,
        }
    }
}

/// Thin typed wrapper around `RestClient` for the Qryptos (Quoine) API
pub struct QryptosRestClient<R: RestClient> {
    client: R,
    capabilities: Capabilities,
}

impl<R: RestClient> QryptosRestClient<R> {
    pub fn new(client: R) -> Self {
        Self {
            client,
            capabilities: Capabilities::default(),
        }
    }

    /// Override the declared capabilities.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// List all products with their current ticker data
    pub async fn products(&self) -> Result<Vec<QryptosProduct>, ExporterError> {
        self.client.get_json("/products", &[], false).await
    }

    /// Fetch one product by its pair code (e.g. `BTCUSD`)
    pub async fn product_by_code(&self, code: &str) -> Result<QryptosProduct, ExporterError> {
        let endpoint = format!("/products/code/CASH/{}", code);
        self.client.get_json(&endpoint, &[], false).await
    }

    /// List markets (same record shape as products)
    pub async fn markets(&self) -> Result<Vec<QryptosProduct>, ExporterError> {
        self.client.get_json("/markets", &[], false).await
    }

    /// Fetch account balances (authenticated)
    pub async fn balance(&self) -> Result<Vec<QryptosAccountBalance>, ExporterError> {
        self.client.get_json("/accounts/balance", &[], true).await
    }
}
