//! Dashboard state persistence: JSON save/load across restarts.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub welcome_dismissed: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        start: Some(app.picker.start),
        end: Some(app.picker.end),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state. Saved dates are clamped to the picker's maximum.
pub fn apply(app: &mut AppState, state: PersistedState) {
    let max = app.picker.max;
    if let Some(start) = state.start {
        app.picker.start = start.min(max);
    }
    if let Some(end) = state.end {
        app.picker.end = end.min(max);
    }
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
