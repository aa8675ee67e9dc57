//! Runs the work the dashboard asked for between frames.
//!
//! The main loop draws first, so a pending fetch is visible as the busy
//! indicator while the blocking vendor call below runs.

use nqview_core::retrieval::RetrievalClient;
use nqview_core::vendor::HistoricalSource;
use tracing::warn;

use crate::app::{AppState, ErrorCategory, Phase};

/// Whether `service` has anything to do.
pub fn has_work(app: &AppState) -> bool {
    app.phase == Phase::Fetching || app.export_requested
}

/// Carry out a pending fetch and a pending download, in that order.
pub fn service<S: HistoricalSource>(app: &mut AppState, client: &RetrievalClient<'_, S>) {
    if app.phase == Phase::Fetching {
        match app.pending {
            Some(range) => {
                let outcome = client.fetch_bars(range);
                app.complete_fetch(outcome);
            }
            None => {
                warn!("fetch requested without a window");
                app.phase = Phase::Idle;
            }
        }
    }

    if app.export_requested {
        app.export_requested = false;
        export_display(app, client);
    }
}

fn export_display<S: HistoricalSource>(app: &mut AppState, client: &RetrievalClient<'_, S>) {
    let (Some(path), Some(display)) = (app.download_path(), app.display.as_ref()) else {
        return;
    };
    match client.export(&display.result, &path) {
        Ok(()) => app.set_status(format!("Saved {}", path.display())),
        Err(e) => app.push_error(
            ErrorCategory::Export,
            e.to_string(),
            path.display().to_string(),
        ),
    }
}
