use anyhow::Result;
use clap::Parser;
use crypto_exporters::core::config::Settings;
use crypto_exporters::exchanges::qryptos::QryptosCollector;
use crypto_exporters::exposition;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qryptos-exporter")]
#[command(about = "Prometheus exporter for Qryptos exchange rates and balances", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML override file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level when LOGLEVEL is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOGLEVEL")
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let defaults = Settings::qryptos_defaults();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(defaults.default_config_path()));
    let settings = defaults.load_overrides(&config_path)?;
    tracing::debug!(?settings, "loaded settings");

    let collector = QryptosCollector::from_settings(&settings).await?;
    exposition::run(settings, collector).await?;
    Ok(())
}
