pub mod collector;
pub mod conversions;
pub mod rest;
pub mod types;

pub use collector::{QryptosCollector, TickerStrategy};

/// Exchange label attached to every Qryptos metric sample.
pub const EXCHANGE_NAME: &str = "qryptos";
