//! Batch export logic behind the `nqview` binary.
//!
//! Kept out of `main.rs` so it runs against any `HistoricalSource`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use nqview_core::config::AppConfig;
use nqview_core::domain::{DataKind, TimeRange};
use nqview_core::retrieval::RetrievalClient;
use nqview_core::vendor::HistoricalSource;
use tracing::info;

/// How a batch run ended. Both variants are successes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Saved { path: PathBuf, rows: usize },
    NoData,
}

impl BatchOutcome {
    /// Line printed to stdout.
    pub fn message(&self) -> String {
        match self {
            BatchOutcome::Saved { path, .. } => {
                format!("Data successfully saved to {}", path.display())
            }
            BatchOutcome::NoData => "No data available for the specified date range.".to_string(),
        }
    }
}

/// Default batch mode: configured window, OHLCV, configured output file.
pub fn run_batch<S: HistoricalSource>(client: &RetrievalClient<'_, S>) -> Result<BatchOutcome> {
    let config = client.config();
    run_fetch(
        client,
        DataKind::Bars,
        config.default_range(),
        &config.output.file,
    )
}

/// Fetch one kind over `range` and export it to `out`. An empty result
/// writes nothing.
pub fn run_fetch<S: HistoricalSource>(
    client: &RetrievalClient<'_, S>,
    kind: DataKind,
    range: TimeRange,
    out: &Path,
) -> Result<BatchOutcome> {
    let result = client.fetch(kind, range)?;

    if result.is_empty() {
        info!(%range, "no {kind} data in window, nothing written");
        return Ok(BatchOutcome::NoData);
    }

    client.export(&result, out)?;
    Ok(BatchOutcome::Saved {
        path: out.to_path_buf(),
        rows: result.height(),
    })
}

/// Window from optional CLI bounds, falling back to the configured window.
pub fn resolve_range(config: &AppConfig, start: Option<&str>, end: Option<&str>) -> Result<TimeRange> {
    let default = config.default_range();
    let start = start
        .map(parse_instant)
        .transpose()?
        .unwrap_or_else(|| default.start());
    let end = end
        .map(parse_instant)
        .transpose()?
        .unwrap_or_else(|| default.end());
    Ok(TimeRange::new(start, end)?)
}

/// RFC 3339 instant, or a bare `YYYY-MM-DD` date at midnight UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("'{s}' is neither an RFC 3339 instant nor a YYYY-MM-DD date"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Destination for `fetch` when `--out` is absent: the batch file for bars,
/// `<export_dir>/<stem>_<kind>.csv` otherwise.
pub fn default_output(config: &AppConfig, kind: DataKind) -> PathBuf {
    let suffix = match kind {
        DataKind::Bars => return config.output.file.clone(),
        DataKind::Trades => "trades",
        DataKind::Depth => "mbp10",
        DataKind::Reference => "definitions",
    };
    config
        .output
        .export_dir
        .join(format!("{}_{suffix}.csv", config.output.stem()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_dates() {
        assert_eq!(
            parse_instant("2025-03-21T14:30:00-04:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 21, 18, 30, 0).unwrap()
        );
        assert_eq!(
            parse_instant("2025-03-21").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap()
        );
        assert!(parse_instant("21/03/2025").is_err());
    }

    #[test]
    fn missing_bounds_use_config_window() {
        let config = AppConfig::default();
        let range = resolve_range(&config, None, Some("2025-03-21T16:00:00Z")).unwrap();
        assert_eq!(range.start(), config.default_range().start());
        assert_eq!(range.end_iso(), "2025-03-21T16:00:00Z");
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = AppConfig::default();
        assert!(resolve_range(&config, Some("2025-03-22"), Some("2025-03-21")).is_err());
    }

    #[test]
    fn default_outputs_per_kind() {
        let config = AppConfig::default();
        assert_eq!(
            default_output(&config, DataKind::Bars),
            PathBuf::from("data/nq_futures_data.csv")
        );
        assert_eq!(
            default_output(&config, DataKind::Depth),
            PathBuf::from("data/nq_futures_data_mbp10.csv")
        );
    }

    #[test]
    fn outcome_messages() {
        let saved = BatchOutcome::Saved {
            path: PathBuf::from("data/nq_futures_data.csv"),
            rows: 2,
        };
        assert_eq!(saved.message(), "Data successfully saved to data/nq_futures_data.csv");
        assert_eq!(
            BatchOutcome::NoData.message(),
            "No data available for the specified date range."
        );
    }
}
