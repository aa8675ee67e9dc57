//! Tabular results: the normalized frame handed to the front ends.

pub mod normalize;
pub mod summary;

use chrono::{DateTime, Utc};
use polars::prelude::*;

use crate::domain::{Bar, DataKind};

pub use normalize::{normalize, ShapeError, INDEX_COLUMN, OHLCV_COLUMNS};
pub use summary::{summarize, ColumnSummary};

/// A normalized fetch result.
///
/// When indexed, the first column is `ts_event` typed `Datetime(ns)`.
/// Built once per fetch and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TabularResult {
    kind: DataKind,
    frame: DataFrame,
    index: Option<&'static str>,
}

impl TabularResult {
    pub(crate) fn indexed(kind: DataKind, frame: DataFrame) -> Self {
        Self {
            kind,
            frame,
            index: Some(INDEX_COLUMN),
        }
    }

    pub(crate) fn unindexed(kind: DataKind, frame: DataFrame) -> Self {
        Self {
            kind,
            frame,
            index: None,
        }
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn index_name(&self) -> Option<&'static str> {
        self.index
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// All column names, index first when present.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    /// Column names excluding the index.
    pub fn data_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|n| Some(n.as_str()) != self.index)
            .collect()
    }

    /// Index values as UTC instants; `None` for unindexed results.
    pub fn timestamps(&self) -> Option<Vec<Option<DateTime<Utc>>>> {
        let name = self.index?;
        let nanos = self.frame.column(name).ok()?.cast(&DataType::Int64).ok()?;
        let values = nanos.i64().ok()?;
        Some(
            values
                .iter()
                .map(|v| v.map(DateTime::from_timestamp_nanos))
                .collect(),
        )
    }

    /// Whether the index is non-decreasing as delivered. Unindexed results
    /// are trivially ordered.
    pub fn index_is_monotonic(&self) -> bool {
        let Some(ts) = self.timestamps() else {
            return true;
        };
        ts.windows(2).all(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => a <= b,
            _ => true,
        })
    }

    /// Typed view of an OHLCV result; empty for other kinds.
    pub fn bars(&self) -> Vec<Bar> {
        if self.kind != DataKind::Bars {
            return Vec::new();
        }
        let Some(ts) = self.timestamps() else {
            return Vec::new();
        };
        let [open, high, low, close, volume] = OHLCV_COLUMNS.map(|name| self.f64_values(name));

        ts.into_iter()
            .enumerate()
            .filter_map(|(i, t)| {
                Some(Bar {
                    ts_event: t?,
                    open: open.get(i).copied().flatten().unwrap_or(f64::NAN),
                    high: high.get(i).copied().flatten().unwrap_or(f64::NAN),
                    low: low.get(i).copied().flatten().unwrap_or(f64::NAN),
                    close: close.get(i).copied().flatten().unwrap_or(f64::NAN),
                    volume: volume.get(i).copied().flatten().unwrap_or(0.0),
                })
            })
            .collect()
    }

    fn f64_values(&self, name: &str) -> Vec<Option<f64>> {
        self.frame
            .column(name)
            .ok()
            .and_then(|c| c.cast(&DataType::Float64).ok())
            .and_then(|c| c.f64().ok().map(|ca| ca.iter().collect()))
            .unwrap_or_default()
    }

    /// Rows `offset..offset + limit` rendered as display strings.
    pub fn rows(&self, offset: usize, limit: usize) -> Vec<Vec<String>> {
        let end = (offset + limit).min(self.height());
        (offset..end)
            .map(|i| {
                self.frame
                    .get_columns()
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .map(|v| match col.name().as_str() {
                                "volume" => format_count(&v),
                                _ => format_cell(&v),
                            })
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// Min/max/mean for each numeric data column.
    pub fn summary(&self) -> Vec<ColumnSummary> {
        summarize(&self.frame, self.index)
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn with_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Counts read as integers with separators, whatever dtype carried them.
fn format_count(value: &AnyValue) -> String {
    match value.extract::<f64>() {
        Some(v) if v.is_finite() => with_thousands(v.round() as i64),
        _ => format_cell(value),
    }
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::Float32(v) => format!("{v:.2}"),
        AnyValue::Datetime(v, unit, _) => {
            let nanos = match unit {
                TimeUnit::Nanoseconds => *v,
                TimeUnit::Microseconds => v.saturating_mul(1_000),
                TimeUnit::Milliseconds => v.saturating_mul(1_000_000),
            };
            DateTime::from_timestamp_nanos(nanos)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        }
        other => other.to_string(),
    }
}
