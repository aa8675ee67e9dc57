//! Shape normalization: raw vendor frame in, canonical `TabularResult` out.
//!
//! OHLCV frames are pruned to the five bar columns and cast to Float64.
//! Trades and depth keep every vendor column. All time-series kinds get
//! `ts_event` cast to `Datetime(ns)` and moved to the front. Row order is
//! never touched.

use polars::prelude::*;
use thiserror::Error;

use super::TabularResult;
use crate::domain::DataKind;

/// Internal name of the event-timestamp index.
pub const INDEX_COLUMN: &str = "ts_event";

/// Retained OHLCV columns, in output order.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("column '{column}' is {dtype}, expected a numeric type")]
    NonNumeric { column: String, dtype: String },

    #[error("bad timestamp index: {reason}")]
    BadIndex { reason: String },
}

/// Normalize a raw vendor frame into the canonical shape for `kind`.
///
/// A zero-row frame is a valid empty result whatever its column types: a
/// header-only CSV body decodes with every column typed as a string.
pub fn normalize(kind: DataKind, raw: DataFrame) -> Result<TabularResult, ShapeError> {
    if !kind.is_time_indexed() {
        return Ok(TabularResult::unindexed(kind, raw));
    }
    let frame = match kind {
        DataKind::Bars if raw.height() == 0 => empty_bars()?,
        DataKind::Bars => retain_ohlcv(promote_index(raw)?)?,
        _ if raw.height() == 0 => empty_passthrough(&raw)?,
        _ => promote_index(raw)?,
    };
    Ok(TabularResult::indexed(kind, frame))
}

/// Cast `ts_event` (integer nanoseconds) to `Datetime(ns)` and move it first.
fn promote_index(mut df: DataFrame) -> Result<DataFrame, ShapeError> {
    let raw = df
        .column(INDEX_COLUMN)
        .map_err(|_| ShapeError::MissingColumn {
            column: INDEX_COLUMN.to_string(),
        })?;
    let nulls_before = raw.null_count();

    let ts = raw
        .cast(&DataType::Datetime(TimeUnit::Nanoseconds, None))
        .map_err(|e| ShapeError::BadIndex {
            reason: e.to_string(),
        })?;
    if ts.null_count() > nulls_before {
        return Err(ShapeError::BadIndex {
            reason: format!("'{INDEX_COLUMN}' has values that are not timestamps"),
        });
    }

    df.with_column(ts).map_err(|e| ShapeError::BadIndex {
        reason: e.to_string(),
    })?;

    let mut order: Vec<PlSmallStr> = vec![INDEX_COLUMN.into()];
    order.extend(
        df.get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != INDEX_COLUMN)
            .cloned(),
    );
    df.select(order).map_err(|e| ShapeError::BadIndex {
        reason: e.to_string(),
    })
}

/// Keep the index plus the five OHLCV columns, each cast to Float64.
fn retain_ohlcv(df: DataFrame) -> Result<DataFrame, ShapeError> {
    let mut columns = Vec::with_capacity(OHLCV_COLUMNS.len() + 1);
    columns.push(df.column(INDEX_COLUMN).cloned().map_err(|_| {
        ShapeError::MissingColumn {
            column: INDEX_COLUMN.to_string(),
        }
    })?);

    for name in OHLCV_COLUMNS {
        let col = df.column(name).map_err(|_| ShapeError::MissingColumn {
            column: name.to_string(),
        })?;
        if !is_numeric(col.dtype()) {
            return Err(ShapeError::NonNumeric {
                column: name.to_string(),
                dtype: col.dtype().to_string(),
            });
        }
        let cast = col
            .cast(&DataType::Float64)
            .map_err(|_| ShapeError::NonNumeric {
                column: name.to_string(),
                dtype: col.dtype().to_string(),
            })?;
        columns.push(cast);
    }

    build_frame(columns)
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn empty_index_column() -> Column {
    Column::new_empty(
        INDEX_COLUMN.into(),
        &DataType::Datetime(TimeUnit::Nanoseconds, None),
    )
}

fn build_frame(columns: Vec<Column>) -> Result<DataFrame, ShapeError> {
    DataFrame::new(columns).map_err(|e| ShapeError::BadIndex {
        reason: e.to_string(),
    })
}

fn empty_bars() -> Result<DataFrame, ShapeError> {
    let mut columns = vec![empty_index_column()];
    columns.extend(
        OHLCV_COLUMNS
            .iter()
            .map(|name| Column::new_empty((*name).into(), &DataType::Float64)),
    );
    build_frame(columns)
}

/// Empty index first, then the vendor's other columns as delivered.
fn empty_passthrough(raw: &DataFrame) -> Result<DataFrame, ShapeError> {
    let mut columns = vec![empty_index_column()];
    columns.extend(
        raw.get_columns()
            .iter()
            .filter(|col| col.name().as_str() != INDEX_COLUMN)
            .cloned(),
    );
    build_frame(columns)
}
