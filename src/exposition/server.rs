use crate::core::config::Settings;
use crate::core::errors::ExporterError;
use crate::core::traits::MetricSource;
use crate::exposition::encode::encode_snapshot;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared scrape-handler state: the collector behind an async mutex, so
/// concurrent scrapes serialize instead of racing the fetch path.
pub struct MetricsState<C> {
    source: Arc<Mutex<C>>,
}

impl<C> Clone for MetricsState<C> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

/// Register the collector and serve `/metrics` until the process dies.
pub async fn serve<C>(settings: &Settings, collector: C) -> Result<(), ExporterError>
where
    C: MetricSource + 'static,
{
    let state = MetricsState {
        source: Arc::new(Mutex::new(collector)),
    };
    let app = Router::new()
        .route("/metrics", get(metrics::<C>))
        .route("/health", get(health))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.listen_port));
    info!(%addr, exporter = settings.exporter, "serving metrics");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

/// Each scrape runs a fresh fetch cycle before rendering, so the response
/// always reflects data the collector just gathered (or its retained state
/// when the upstream was unavailable).
async fn metrics<C>(State(state): State<MetricsState<C>>) -> impl IntoResponse
where
    C: MetricSource + 'static,
{
    let mut source = state.source.lock().await;
    source.refresh().await;
    let snapshot = source.snapshot();
    drop(source);

    match encode_snapshot(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
