use crate::core::types::MetricSnapshot;
use async_trait::async_trait;

/// The contract between a collector and the exposition layer.
///
/// A collector owns the exchange-specific fetch logic and the records from
/// the most recent successful fetch. `refresh` never fails outward: fetch
/// errors are logged and the previous records are retained, so the exposed
/// metric set is stale-but-present rather than empty.
#[async_trait]
pub trait MetricSource: Send {
    /// Exchange label applied to every emitted sample.
    fn exchange(&self) -> &'static str;

    /// Run one fetch cycle against the upstream API, updating the stored
    /// records on success.
    async fn refresh(&mut self);

    /// The current records, ready for rendering.
    fn snapshot(&self) -> MetricSnapshot;
}
