use serde::Deserialize;
use std::collections::HashMap;

/// Kraken wraps every v1 response in an `{error, result}` envelope; `error`
/// is a list of `ESeverity:Category` strings and `result` is absent when the
/// call failed.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

/// One entry of the `AssetPairs` result map.
///
/// Only the alternate name matters here; it is the symbol the `Ticker`
/// endpoint accepts in its `pair` parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenAssetPair {
    pub altname: String,
}

/// One entry of the `Ticker` result map, keyed by the concatenated pair
/// code. `c` is the close array: `[last trade price, lot volume]`.
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenTicker {
    #[serde(rename = "c")]
    pub close: Vec<String>,
}

pub type KrakenAssetPairs = HashMap<String, KrakenAssetPair>;
pub type KrakenTickers = HashMap<String, KrakenTicker>;
