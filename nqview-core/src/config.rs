//! Application configuration, built once at startup and read-only afterwards.
//!
//! Every section has defaults, so an empty TOML document (or no file at all)
//! yields the stock NQ setup. Front ends own the `AppConfig` and hand out
//! `&AppConfig` to the components that need it.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DataKind, Instrument, Schema, TimeRange};

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "NQVIEW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("schema {schema} cannot serve {kind} requests")]
    SchemaMismatch { kind: DataKind, schema: Schema },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vendor: VendorConfig,
    pub instrument: Instrument,
    pub schemas: SchemaConfig,
    pub window: WindowConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from an explicit path, else from `$NQVIEW_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(p) => Self::from_file(Path::new(&p)),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (DataKind::Bars, self.schemas.bars, self.schemas.bars.is_ohlcv()),
            (DataKind::Trades, self.schemas.trades, self.schemas.trades == Schema::Trades),
            (DataKind::Depth, self.schemas.depth, self.schemas.depth == Schema::Mbp10),
            (
                DataKind::Reference,
                self.schemas.reference,
                self.schemas.reference == Schema::Definition,
            ),
        ];
        for (kind, schema, ok) in checks {
            if !ok {
                return Err(ConfigError::SchemaMismatch { kind, schema });
            }
        }
        Ok(())
    }

    /// Schema used to serve a given data kind.
    pub fn schema_for(&self, kind: DataKind) -> Schema {
        match kind {
            DataKind::Bars => self.schemas.bars,
            DataKind::Trades => self.schemas.trades,
            DataKind::Depth => self.schemas.depth,
            DataKind::Reference => self.schemas.reference,
        }
    }

    /// The default query window.
    pub fn default_range(&self) -> TimeRange {
        self.window.range
    }
}

/// Vendor connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Inline key. `api_key_env` takes precedence when that variable is set.
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl VendorConfig {
    /// Resolve the API key: environment first, then the inline value.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "DATABENTO_API_KEY".into(),
            base_url: "https://hist.databento.com".into(),
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Schema name per data kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub bars: Schema,
    pub reference: Schema,
    pub trades: Schema,
    pub depth: Schema,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            bars: Schema::Ohlcv1m,
            reference: Schema::Definition,
            trades: Schema::Trades,
            depth: Schema::Mbp10,
        }
    }
}

/// Default query window; also the upper bound for the interactive pickers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(flatten)]
    pub range: TimeRange,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let start = Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 0).unwrap();
        Self {
            range: TimeRange::new(start, end).expect("default window is ordered"),
        }
    }
}

/// Where exports land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Batch-mode destination.
    pub file: PathBuf,
    /// Directory for interactive downloads and the TUI log file.
    pub export_dir: PathBuf,
}

impl OutputConfig {
    /// File stem of the batch destination, used to name downloads.
    pub fn stem(&self) -> String {
        self.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("data/nq_futures_data.csv"),
            export_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.instrument.dataset, "GLBX.MDP3");
        assert_eq!(config.instrument.symbol, "NQM5");
        assert_eq!(config.schemas.bars, Schema::Ohlcv1m);
        assert_eq!(config.schemas.depth, Schema::Mbp10);
        assert_eq!(config.output.file, PathBuf::from("data/nq_futures_data.csv"));
        assert_eq!(
            config.default_range().start_date(),
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap()
        );
        assert_eq!(
            config.default_range().end_date(),
            NaiveDate::from_ymd_opt(2025, 3, 22).unwrap()
        );
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = AppConfig::from_toml(
            r#"
[instrument]
symbol = "NQU5"

[schemas]
bars = "ohlcv-1h"

[window]
start = "2025-06-02T13:30:00Z"
end = "2025-06-02T20:00:00Z"
"#,
        )
        .unwrap();
        assert_eq!(config.instrument.symbol, "NQU5");
        assert_eq!(config.instrument.dataset, "GLBX.MDP3");
        assert_eq!(config.schemas.bars, Schema::Ohlcv1h);
        assert_eq!(config.schemas.trades, Schema::Trades);
        assert_eq!(config.default_range().start_iso(), "2025-06-02T13:30:00Z");
    }

    #[test]
    fn inverted_window_is_rejected() {
        let result = AppConfig::from_toml(
            "[window]\nstart = \"2025-03-23T00:00:00Z\"\nend = \"2025-03-22T00:00:00Z\"\n",
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn mismatched_schema_is_rejected() {
        let result = AppConfig::from_toml("[schemas]\nbars = \"trades\"\n");
        assert!(matches!(
            result,
            Err(ConfigError::SchemaMismatch {
                kind: DataKind::Bars,
                ..
            })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::from_file(Path::new("/nonexistent/nqview.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/nqview.toml"));
    }

    #[test]
    fn debug_redacts_inline_key() {
        let vendor = VendorConfig {
            api_key: Some("db-secret".into()),
            ..VendorConfig::default()
        };
        let rendered = format!("{vendor:?}");
        assert!(!rendered.contains("db-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn inline_key_used_when_env_unset() {
        let vendor = VendorConfig {
            api_key: Some("db-inline".into()),
            api_key_env: "NQVIEW_TEST_UNSET_KEY_VAR".into(),
            ..VendorConfig::default()
        };
        assert_eq!(vendor.resolve_api_key().as_deref(), Some("db-inline"));
    }

    #[test]
    fn schema_for_maps_each_kind() {
        let config = AppConfig::default();
        assert_eq!(config.schema_for(DataKind::Bars), Schema::Ohlcv1m);
        assert_eq!(config.schema_for(DataKind::Trades), Schema::Trades);
        assert_eq!(config.schema_for(DataKind::Depth), Schema::Mbp10);
        assert_eq!(config.schema_for(DataKind::Reference), Schema::Definition);
    }

    #[test]
    fn output_stem_names_downloads() {
        assert_eq!(OutputConfig::default().stem(), "nq_futures_data");
    }
}
