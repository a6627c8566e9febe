use crate::core::config::{ExportMode, Settings};
use crate::core::errors::ExporterError;
use crate::core::traits::MetricSource;
use crate::exposition::encode::encode_snapshot;
use crate::exposition::{server, textfile};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Where the text-mode output lands for this exporter.
pub fn textfile_path(settings: &Settings) -> PathBuf {
    Path::new(&settings.prom_folder).join(format!("{}.prom", settings.exporter))
}

/// Run the exporter in its configured mode. Neither mode returns except on
/// a fatal error; shutdown is the process manager's job.
pub async fn run<C>(settings: Settings, collector: C) -> Result<(), ExporterError>
where
    C: MetricSource + 'static,
{
    match settings.export {
        ExportMode::Text => run_textfile(&settings, collector).await,
        ExportMode::Http => server::serve(&settings, collector).await,
    }
}

/// Text mode: render, write, sleep, refresh, forever. The collector's
/// construction-time fetch feeds the first write.
async fn run_textfile<C>(settings: &Settings, mut collector: C) -> Result<(), ExporterError>
where
    C: MetricSource,
{
    let path = textfile_path(settings);
    let interval = Duration::from_secs(settings.interval);
    loop {
        let body = encode_snapshot(&collector.snapshot())?;
        textfile::write_textfile(&path, &body)?;
        debug!(path = %path.display(), "wrote metrics");
        sleep(interval).await;
        collector.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textfile_path_combines_folder_and_exporter_name() {
        let settings = Settings::kraken_defaults();
        assert_eq!(
            textfile_path(&settings),
            PathBuf::from("/var/lib/node_exporter/kraken_exporter.prom")
        );
    }
}
