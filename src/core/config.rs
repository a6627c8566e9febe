use config::{Config, File, FileFormat};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// How the exporter publishes its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Write a `.prom` file for node-exporter textfile collection.
    #[default]
    Text,
    /// Serve a `/metrics` endpoint over HTTP.
    Http,
}

impl ExportMode {
    /// Parse a config-file value. Anything outside the closed set is
    /// rejected so the caller can keep its default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "http" => Some(Self::Http),
            _ => None,
        }
    }
}

/// Per-process exporter settings. Loaded once at startup; immutable for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Exporter name; also the top-level key in the YAML override file and
    /// the stem of the textfile output name.
    pub exporter: &'static str,
    pub prom_folder: String,
    /// Poll interval in seconds.
    pub interval: u64,
    pub export: ExportMode,
    pub listen_port: u16,
    /// Upstream API base URL.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Trade-symbol allowlist; when empty the collector discovers symbols
    /// itself where the exchange supports it.
    pub trade_symbols: Vec<String>,
    pub api_key: Option<Secret<String>>,
    pub api_secret: Option<Secret<String>>,
}

impl Settings {
    pub fn kraken_defaults() -> Self {
        Self {
            exporter: "kraken_exporter",
            prom_folder: "/var/lib/node_exporter".to_string(),
            interval: 60,
            export: ExportMode::Text,
            listen_port: 9310,
            url: "https://api.kraken.com".to_string(),
            timeout: 5,
            trade_symbols: Vec::new(),
            api_key: None,
            api_secret: None,
        }
    }

    pub fn qryptos_defaults() -> Self {
        Self {
            exporter: "qryptos_exporter",
            prom_folder: "/var/lib/node_exporter".to_string(),
            interval: 60,
            export: ExportMode::Text,
            listen_port: 9305,
            url: "https://api.liquid.com".to_string(),
            timeout: 30,
            trade_symbols: Vec::new(),
            api_key: None,
            api_secret: None,
        }
    }

    /// Default on-disk location of the override file for this exporter.
    pub fn default_config_path(&self) -> String {
        format!("/etc/{0}/{0}.yaml", self.exporter)
    }

    /// Both credentials must be present for authenticated operations.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// Apply an optional YAML override file on top of these defaults.
    ///
    /// The file nests overrides under the exporter name key; only keys it
    /// explicitly sets replace the defaults (shallow, key-by-key merge).
    /// A missing file leaves the defaults untouched; a malformed file is
    /// fatal.
    pub fn load_overrides(mut self, path: &Path) -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml).required(false))
            .build()?;

        let mut sections: HashMap<String, SettingsPatch> = cfg.try_deserialize()?;
        if let Some(patch) = sections.remove(self.exporter) {
            self.apply(patch);
        }
        Ok(self)
    }

    fn apply(&mut self, patch: SettingsPatch) {
        if let Some(folder) = patch.prom_folder.filter(|f| !f.is_empty()) {
            self.prom_folder = folder;
        }
        // Zero means "unset": a zero interval or timeout keeps the default.
        if let Some(interval) = patch.interval.filter(|i| *i > 0) {
            self.interval = interval;
        }
        if let Some(export) = patch.export {
            match ExportMode::parse(&export) {
                Some(mode) => self.export = mode,
                None => warn!(
                    exporter = self.exporter,
                    value = %export,
                    "ignoring unknown export mode, keeping default"
                ),
            }
        }
        if let Some(port) = patch.listen_port.filter(|p| *p > 0) {
            self.listen_port = port;
        }
        if let Some(url) = patch.url.filter(|u| !u.is_empty()) {
            self.url = url;
        }
        if let Some(timeout) = patch.timeout.filter(|t| *t > 0) {
            self.timeout = timeout;
        }
        if let Some(symbols) = patch.trade_symbols.filter(|s| !s.is_empty()) {
            self.trade_symbols = symbols;
        }
        if let Some(key) = patch.api_key.filter(|k| !k.is_empty()) {
            self.api_key = Some(Secret::new(key));
        }
        if let Some(secret) = patch.api_secret.filter(|s| !s.is_empty()) {
            self.api_secret = Some(Secret::new(secret));
        }
    }
}

/// The keys an override file may set. Everything is optional; unset keys
/// keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct SettingsPatch {
    prom_folder: Option<String>,
    interval: Option<u64>,
    export: Option<String>,
    listen_port: Option<u16>,
    url: Option<String>,
    timeout: Option<u64>,
    trade_symbols: Option<Vec<String>>,
    api_key: Option<String>,
    api_secret: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    File(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
