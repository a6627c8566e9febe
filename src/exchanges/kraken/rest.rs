use crate::core::errors::ExporterError;
use crate::core::kernel::RestClient;
use crate::exchanges::kraken::types::{KrakenAssetPairs, KrakenResponse, KrakenTickers};

/// Thin typed wrapper around `RestClient` for the Kraken public API
pub struct KrakenRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> KrakenRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    /// List tradable asset pairs
    pub async fn asset_pairs(&self) -> Result<KrakenAssetPairs, ExporterError> {
        let response: KrakenResponse<KrakenAssetPairs> = self
            .client
            .get_json("/0/public/AssetPairs", &[], false)
            .await?;
        unwrap_result(response)
    }

    /// Get ticker information for the given comma-joined pair list
    pub async fn ticker(&self, pairs: &str) -> Result<KrakenTickers, ExporterError> {
        let response: KrakenResponse<KrakenTickers> = self
            .client
            .get_json("/0/public/Ticker", &[("pair", pairs)], false)
            .await?;
        unwrap_result(response)
    }
}

/// Unwrap Kraken's response envelope: a reported error or a missing result
/// both count as a failed call.
fn unwrap_result<T>(response: KrakenResponse<T>) -> Result<T, ExporterError> {
    if !response.error.is_empty() {
        return Err(ExporterError::ExchangeError(response.error.join(", ")));
    }
    response
        .result
        .ok_or_else(|| ExporterError::ExchangeError("response carried no result".to_string()))
}
