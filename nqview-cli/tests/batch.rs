//! Batch mode against the in-memory vendor.

use std::path::PathBuf;

use nqview_cli::{run_batch, run_fetch, BatchOutcome};
use nqview_core::config::AppConfig;
use nqview_core::domain::DataKind;
use nqview_core::retrieval::{RetrievalClient, RetrievalError};
use nqview_core::vendor::{FixtureSource, VendorError};

fn config_writing_to(path: PathBuf) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.file = path;
    config
}

#[test]
fn batch_writes_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("nq_futures_data.csv");
    let config = config_writing_to(path.clone());
    let client = RetrievalClient::new(&config, FixtureSource::nq_sample().unwrap());

    let outcome = run_batch(&client).unwrap();

    assert_eq!(
        outcome,
        BatchOutcome::Saved {
            path: path.clone(),
            rows: 2
        }
    );
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("timestamp,open,high,low,close,volume\n"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn empty_window_writes_nothing_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nq_futures_data.csv");
    let config = config_writing_to(path.clone());
    let client = RetrievalClient::new(&config, FixtureSource::new());

    let outcome = run_batch(&client).unwrap();

    assert_eq!(outcome, BatchOutcome::NoData);
    assert_eq!(
        outcome.message(),
        "No data available for the specified date range."
    );
    assert!(!path.exists());
}

#[test]
fn vendor_failure_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nq_futures_data.csv");
    let config = config_writing_to(path.clone());
    let client = RetrievalClient::new(
        &config,
        FixtureSource::failing(VendorError::Authentication("invalid API key".into())),
    );

    let err = run_batch(&client).unwrap_err();

    let retrieval = err.downcast_ref::<RetrievalError>().unwrap();
    assert_eq!(retrieval.operation(), "fetch_bars");
    assert!(!path.exists());
}

#[test]
fn export_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let config = config_writing_to(blocker.join("out.csv"));
    let client = RetrievalClient::new(&config, FixtureSource::nq_sample().unwrap());

    let err = run_batch(&client).unwrap_err();
    assert!(err
        .downcast_ref::<nqview_core::export::ExportError>()
        .is_some());
}

#[test]
fn fetch_exports_other_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("trades.csv");
    let config = AppConfig::default();
    let client = RetrievalClient::new(&config, FixtureSource::nq_sample().unwrap());

    let outcome = run_fetch(&client, DataKind::Trades, config.default_range(), &out).unwrap();

    assert!(matches!(outcome, BatchOutcome::Saved { rows: 2, .. }));
    let header = std::fs::read_to_string(&out)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert!(header.starts_with("timestamp,"));
    assert!(header.contains("price"));
}
