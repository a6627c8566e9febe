pub mod collector;
pub mod conversions;
pub mod rest;
pub mod types;

pub use collector::KrakenCollector;

/// Exchange label attached to every Kraken metric sample.
pub const EXCHANGE_NAME: &str = "kraken";
