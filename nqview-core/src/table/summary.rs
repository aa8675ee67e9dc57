//! Per-column summary statistics for the dashboard.

use polars::prelude::*;
use serde::Serialize;

use super::normalize::is_numeric;

/// Min / max / mean of one numeric column, nulls and NaNs skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Summaries for every numeric column except `index`.
pub fn summarize(df: &DataFrame, index: Option<&str>) -> Vec<ColumnSummary> {
    df.get_columns()
        .iter()
        .filter(|col| Some(col.name().as_str()) != index)
        .filter(|col| is_numeric(col.dtype()))
        .filter_map(|col| {
            let values = col.cast(&DataType::Float64).ok()?;
            let ca = values.f64().ok()?;
            Some(summarize_values(col.name().as_str(), ca.iter().flatten()))
        })
        .collect()
}

fn summarize_values(column: &str, values: impl Iterator<Item = f64>) -> ColumnSummary {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut n = 0usize;

    for v in values.filter(|v| !v.is_nan()) {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        n += 1;
    }

    if n == 0 {
        return ColumnSummary {
            column: column.to_string(),
            min: None,
            max: None,
            mean: None,
        };
    }

    ColumnSummary {
        column: column.to_string(),
        min: Some(min),
        max: Some(max),
        mean: Some(sum / n as f64),
    }
}
