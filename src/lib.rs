pub mod core;
pub mod exchanges;
pub mod exposition;

pub use crate::core::config::{ExportMode, Settings};
pub use crate::core::errors::ExporterError;
pub use crate::core::traits::MetricSource;
pub use crate::core::types::{AccountType, BalanceRecord, MetricSnapshot, RateRecord};
pub use crate::exchanges::kraken::KrakenCollector;
pub use crate::exchanges::qryptos::QryptosCollector;
