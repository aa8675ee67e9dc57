//! nqview core: retrieval and normalization of historical NQ futures data.
//!
//! This crate holds everything the front ends share:
//! - Configuration (instrument, schemas, default window, output paths)
//! - Domain types (time ranges, schema names, bars)
//! - The vendor boundary (`HistoricalSource`) with a Databento client and an
//!   in-memory fixture source
//! - The retrieval client, one typed fetch per data kind
//! - Shape normalization, summary statistics and CSV export
//! - Tracing subscriber setup

pub mod config;
pub mod domain;
pub mod export;
pub mod logging;
pub mod retrieval;
pub mod table;
pub mod vendor;

pub use config::AppConfig;
pub use domain::{Bar, DataKind, TimeRange};
pub use export::ExportError;
pub use retrieval::{RetrievalClient, RetrievalError};
pub use table::TabularResult;

#[cfg(test)]
mod tests {
    use super::*;

    /// The retrieval client is reused across calls and may move between
    /// threads with its source.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<TabularResult>();
        require_sync::<TabularResult>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<RetrievalError>();
        require_sync::<RetrievalError>();
        require_send::<ExportError>();
        require_sync::<ExportError>();
        require_send::<vendor::DatabentoHistorical>();
        require_sync::<vendor::DatabentoHistorical>();
        require_send::<vendor::FixtureSource>();
        require_sync::<vendor::FixtureSource>();
    }
}
