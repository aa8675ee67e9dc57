//! CSV export of tabular results.
//!
//! On disk the event-timestamp index is always called `timestamp`, whatever
//! the in-memory name, so files stay stable if the vendor renames fields.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

use crate::table::TabularResult;

/// Public name of the index column in exported files.
pub const TIMESTAMP_HEADER: &str = "timestamp";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("failed to rename index column: {0}")]
    Rename(#[source] PolarsError),
}

/// Write `result` to `path`, creating parent directories and replacing any
/// existing file.
pub fn write_csv(result: &TabularResult, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut df = public_frame(result)?;
    let mut file = fs::File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Copy of the result frame with the index under its public name.
fn public_frame(result: &TabularResult) -> Result<DataFrame, ExportError> {
    let mut df = result.frame().clone();
    if let Some(index) = result.index_name() {
        df.rename(index, TIMESTAMP_HEADER.into())
            .map_err(ExportError::Rename)?;
    }
    Ok(df)
}

/// File name for an interactive download: `<stem>_<start>_<end>.csv`.
pub fn download_file_name(stem: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{stem}_{}_{}.csv",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataKind;
    use crate::table::normalize;
    use crate::vendor::fixture::{ohlcv_frame, sample_bars};

    #[test]
    fn download_name_embeds_dates() {
        let name = download_file_name(
            "nq_futures_data",
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 22).unwrap(),
        );
        assert_eq!(name, "nq_futures_data_2025-03-21_2025-03-22.csv");
    }

    #[test]
    fn public_frame_renames_index_only() {
        let result = normalize(DataKind::Bars, ohlcv_frame(&sample_bars()).unwrap()).unwrap();
        let df = public_frame(&result).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["timestamp", "open", "high", "low", "close", "volume"]);
        // The result itself keeps its internal name.
        assert_eq!(result.column_names()[0], "ts_event");
    }

    #[test]
    fn unindexed_frame_keeps_names() {
        let df = DataFrame::new(vec![Column::new("raw_symbol".into(), ["NQM5"])]).unwrap();
        let result = normalize(DataKind::Reference, df).unwrap();
        let out = public_frame(&result).unwrap();
        assert!(out.column("raw_symbol").is_ok());
        assert!(out.column(TIMESTAMP_HEADER).is_err());
    }
}
