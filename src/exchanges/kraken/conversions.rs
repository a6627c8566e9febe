use crate::core::types::RateRecord;
use crate::exchanges::kraken::types::KrakenTicker;
use tracing::warn;

/// Map Kraken's nonstandard currency codes to their common forms.
pub fn translate_currency(currency: &str) -> &str {
    match currency {
        "DASH" => "DSH",
        "XBT" => "BTC",
        "DOGE" => "XDG",
        other => other,
    }
}

/// Split a concatenated ticker key like `XXBTZUSD` into source and target
/// currency codes.
///
/// Source is the first three characters and target the last three, except
/// for keys starting with `X` of exactly eight characters, where the source
/// sits at `[1..4]` (four-letter prefixed asset codes like `XXBT`).
pub fn split_pair_code(code: &str) -> Option<(&str, &str)> {
    if code.len() < 6 || !code.is_ascii() {
        return None;
    }
    let source = if code.starts_with('X') && code.len() == 8 {
        &code[1..4]
    } else {
        &code[0..3]
    };
    let target = &code[code.len() - 3..];
    Some((source, target))
}

/// Convert one ticker entry into a rate record: translated source/target
/// codes and the last-trade close price.
pub fn convert_ticker(code: &str, ticker: &KrakenTicker) -> Option<RateRecord> {
    let (source, target) = split_pair_code(code)?;
    let Some(last) = ticker.close.first() else {
        warn!(pair = code, "ticker carried no close price, skipping");
        return None;
    };
    let value = match last.parse::<f64>() {
        Ok(value) => value,
        Err(e) => {
            warn!(pair = code, price = %last, "unparseable close price: {}", e);
            return None;
        }
    };
    Some(RateRecord::new(
        translate_currency(source),
        translate_currency(target),
        value,
    ))
}

/// Whether a discovered altname belongs in the allowlist. Dark-pool/index
/// pairs carry a `.d` suffix and are excluded.
pub fn is_tradable_altname(altname: &str) -> bool {
    !altname.ends_with(".d")
}
