//! Retrieval client: one typed fetch per data kind, plus export.
//!
//! Each fetch is a single request to the `HistoricalSource` followed by
//! normalization. Failures are logged with the operation and window, then
//! returned wrapped; a fetch never hands back a partial result.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::{DataKind, TimeRange};
use crate::export::{self, ExportError};
use crate::table::{normalize, ShapeError, TabularResult};
use crate::vendor::{DefinitionRequest, HistoricalSource, RangeRequest, VendorError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{operation} failed for {range}: {source}")]
    Vendor {
        operation: &'static str,
        range: TimeRange,
        #[source]
        source: VendorError,
    },

    #[error("{operation} returned an unexpected shape for {range}: {source}")]
    Shape {
        operation: &'static str,
        range: TimeRange,
        #[source]
        source: ShapeError,
    },
}

impl RetrievalError {
    pub fn operation(&self) -> &'static str {
        match self {
            RetrievalError::Vendor { operation, .. } | RetrievalError::Shape { operation, .. } => {
                operation
            }
        }
    }
}

/// Fetches and normalizes data for the configured instrument.
///
/// Holds no state beyond the source handle; reuse it sequentially.
pub struct RetrievalClient<'a, S: HistoricalSource> {
    config: &'a AppConfig,
    source: S,
}

impl<'a, S: HistoricalSource> RetrievalClient<'a, S> {
    pub fn new(config: &'a AppConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &AppConfig {
        self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// OHLCV bars, pruned to open/high/low/close/volume.
    pub fn fetch_bars(&self, range: TimeRange) -> Result<TabularResult, RetrievalError> {
        self.fetch_series("fetch_bars", DataKind::Bars, range)
    }

    /// Instrument definitions for the calendar dates of `range`.
    pub fn fetch_reference(&self, range: TimeRange) -> Result<TabularResult, RetrievalError> {
        const OP: &str = "fetch_reference";
        let request = DefinitionRequest::for_range(self.config, range);
        info!(
            operation = OP,
            source = self.source.name(),
            start = %request.start,
            end = %request.end,
            "fetching definitions"
        );
        let raw = self
            .source
            .get_definitions(&request)
            .map_err(|source| vendor_failure(OP, range, source))?;
        self.finish(OP, DataKind::Reference, range, raw)
    }

    /// Trade ticks, every vendor column kept.
    pub fn fetch_trades(&self, range: TimeRange) -> Result<TabularResult, RetrievalError> {
        self.fetch_series("fetch_trades", DataKind::Trades, range)
    }

    /// 10-level market-by-price records, every vendor column kept.
    pub fn fetch_depth(&self, range: TimeRange) -> Result<TabularResult, RetrievalError> {
        self.fetch_series("fetch_depth", DataKind::Depth, range)
    }

    /// Dispatch to the fetch for `kind`.
    pub fn fetch(&self, kind: DataKind, range: TimeRange) -> Result<TabularResult, RetrievalError> {
        match kind {
            DataKind::Bars => self.fetch_bars(range),
            DataKind::Trades => self.fetch_trades(range),
            DataKind::Depth => self.fetch_depth(range),
            DataKind::Reference => self.fetch_reference(range),
        }
    }

    /// Write `result` to `path` as CSV.
    pub fn export(&self, result: &TabularResult, path: &Path) -> Result<(), ExportError> {
        match export::write_csv(result, path) {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    rows = result.height(),
                    "exported {} data",
                    result.kind()
                );
                Ok(())
            }
            Err(e) => {
                error!(operation = "export", path = %path.display(), error = %e, "export failed");
                Err(e)
            }
        }
    }

    fn fetch_series(
        &self,
        operation: &'static str,
        kind: DataKind,
        range: TimeRange,
    ) -> Result<TabularResult, RetrievalError> {
        let request = RangeRequest::for_kind(self.config, kind, range);
        info!(
            operation,
            source = self.source.name(),
            schema = %request.schema,
            %range,
            "fetching {kind} data"
        );
        let raw = self
            .source
            .get_range(&request)
            .map_err(|source| vendor_failure(operation, range, source))?;
        self.finish(operation, kind, range, raw)
    }

    fn finish(
        &self,
        operation: &'static str,
        kind: DataKind,
        range: TimeRange,
        raw: polars::prelude::DataFrame,
    ) -> Result<TabularResult, RetrievalError> {
        let result = normalize(kind, raw).map_err(|source| {
            error!(operation, %range, error = %source, "normalization failed");
            RetrievalError::Shape {
                operation,
                range,
                source,
            }
        })?;

        if !result.index_is_monotonic() {
            warn!(operation, %range, "timestamps are not in ascending order");
        }
        info!(operation, rows = result.height(), "fetched {kind} data");
        Ok(result)
    }
}

fn vendor_failure(operation: &'static str, range: TimeRange, source: VendorError) -> RetrievalError {
    error!(operation, %range, error = %source, "vendor request failed");
    RetrievalError::Vendor {
        operation,
        range,
        source,
    }
}
