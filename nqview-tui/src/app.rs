//! Application state: single-owner, main-thread only.
//!
//! Input handlers only mutate this struct. Fetches and exports are requested
//! here and carried out by `session::service` between frames.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{Days, NaiveDate, NaiveDateTime};

use nqview_core::config::AppConfig;
use nqview_core::domain::{Bar, TimeRange};
use nqview_core::export::download_file_name;
use nqview_core::retrieval::RetrievalError;
use nqview_core::table::{ColumnSummary, TabularResult};

/// Error history is capped at this many records.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Dashboard phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Displayed,
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Export,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Export => "IO",
        }
    }
}

/// Which date field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

/// Start/end calendar pickers, both capped at `max`.
#[derive(Debug, Clone)]
pub struct DatePicker {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub max: NaiveDate,
    pub focus: DateField,
}

impl DatePicker {
    pub fn new(start: NaiveDate, end: NaiveDate, max: NaiveDate) -> Self {
        Self {
            start: start.min(max),
            end: end.min(max),
            max,
            focus: DateField::Start,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DateField::Start => DateField::End,
            DateField::End => DateField::Start,
        };
    }

    /// Move the focused date one day later, never past `max`.
    pub fn increment(&mut self) {
        let max = self.max;
        let date = self.focused_mut();
        if let Some(next) = date.checked_add_days(Days::new(1)) {
            *date = next.min(max);
        }
    }

    /// Move the focused date one day earlier.
    pub fn decrement(&mut self) {
        let date = self.focused_mut();
        if let Some(prev) = date.checked_sub_days(Days::new(1)) {
            *date = prev;
        }
    }

    fn focused_mut(&mut self) -> &mut NaiveDate {
        match self.focus {
            DateField::Start => &mut self.start,
            DateField::End => &mut self.end,
        }
    }

    /// The selected window, or `None` if start is after end.
    pub fn range(&self) -> Option<TimeRange> {
        TimeRange::from_dates(self.start, self.end).ok()
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    ErrorHistory,
}

/// What is on screen after a successful fetch.
#[derive(Debug, Clone)]
pub struct Display {
    pub range: TimeRange,
    pub result: TabularResult,
    pub bars: Vec<Bar>,
    pub summary: Vec<ColumnSummary>,
    pub raw_scroll: usize,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub phase: Phase,
    pub picker: DatePicker,
    /// Window of the fetch in flight.
    pub pending: Option<TimeRange>,
    pub export_requested: bool,
    pub display: Option<Display>,

    pub symbol: String,
    pub instrument_label: String,
    pub export_dir: PathBuf,
    pub output_stem: String,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let window = config.default_range();
        Self {
            running: true,
            phase: Phase::Idle,
            picker: DatePicker::new(window.start_date(), window.end_date(), window.end_date()),
            pending: None,
            export_requested: false,
            display: None,
            symbol: config.instrument.symbol.clone(),
            instrument_label: format!(
                "{} {}",
                config.instrument.symbol, config.instrument.description
            ),
            export_dir: config.output.export_dir.clone(),
            output_stem: config.output.stem(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Enter Fetching for the selected window. Ignored while a fetch is in
    /// flight; an inverted window is rejected with a warning.
    pub fn request_fetch(&mut self) -> bool {
        if self.phase == Phase::Fetching {
            return false;
        }
        let Some(range) = self.picker.range() else {
            self.set_warning("Start date must be on or before end date");
            return false;
        };
        self.pending = Some(range);
        self.phase = Phase::Fetching;
        self.set_status(format!(
            "Fetching {} to {}...",
            self.picker.start, self.picker.end
        ));
        true
    }

    /// Leave Fetching with the outcome of `fetch_bars`.
    pub fn complete_fetch(&mut self, outcome: Result<TabularResult, RetrievalError>) {
        let range = self.pending.take();
        match (outcome, range) {
            (Ok(result), Some(range)) => {
                let rows = result.height();
                self.display = Some(Display {
                    range,
                    bars: result.bars(),
                    summary: result.summary(),
                    result,
                    raw_scroll: 0,
                });
                self.phase = Phase::Displayed;
                if rows == 0 {
                    self.set_warning("No data available for the selected date range.");
                } else {
                    self.set_status(format!("Loaded {rows} bars"));
                }
            }
            (Ok(_), None) => {
                self.phase = Phase::Idle;
            }
            (Err(e), range) => {
                let category = match e {
                    RetrievalError::Vendor { .. } => ErrorCategory::Network,
                    RetrievalError::Shape { .. } => ErrorCategory::Data,
                };
                let context = range
                    .map(|r| format!("{} {r}", e.operation()))
                    .unwrap_or_else(|| e.operation().to_string());
                self.display = None;
                self.phase = Phase::Idle;
                self.push_error(category, e.to_string(), context);
            }
        }
    }

    /// Ask for a download of the displayed result.
    pub fn request_export(&mut self) {
        match &self.display {
            Some(d) if !d.result.is_empty() => self.export_requested = true,
            Some(_) => self.set_warning("Nothing to download: the result is empty"),
            None => self.set_warning("Fetch data before downloading"),
        }
    }

    /// Destination for the download of the displayed result.
    pub fn download_path(&self) -> Option<PathBuf> {
        let display = self.display.as_ref()?;
        Some(self.export_dir.join(download_file_name(
            &self.output_stem,
            display.range.start_date(),
            display.range.end_date(),
        )))
    }

    pub fn scroll_rows(&mut self, delta: isize, page: usize) {
        if let Some(d) = self.display.as_mut() {
            let max = d.result.height().saturating_sub(1);
            let step = delta.unsigned_abs() * page.max(1);
            d.raw_scroll = if delta < 0 {
                d.raw_scroll.saturating_sub(step)
            } else {
                (d.raw_scroll + step).min(max)
            };
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqview_core::vendor::VendorError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn picker_never_passes_max() {
        let mut picker = DatePicker::new(date(2025, 3, 21), date(2025, 3, 22), date(2025, 3, 22));
        picker.toggle_focus();
        picker.increment();
        assert_eq!(picker.end, date(2025, 3, 22));
        picker.toggle_focus();
        picker.increment();
        picker.increment();
        assert_eq!(picker.start, date(2025, 3, 22));
    }

    #[test]
    fn picker_clamps_initial_dates() {
        let picker = DatePicker::new(date(2025, 4, 1), date(2025, 4, 2), date(2025, 3, 22));
        assert_eq!(picker.start, date(2025, 3, 22));
        assert_eq!(picker.end, date(2025, 3, 22));
    }

    #[test]
    fn inverted_picker_has_no_range() {
        let mut picker = DatePicker::new(date(2025, 3, 21), date(2025, 3, 21), date(2025, 3, 22));
        assert!(picker.range().is_some());
        picker.toggle_focus();
        picker.decrement();
        assert!(picker.range().is_none());
    }

    #[test]
    fn fetch_request_rejects_inverted_range() {
        let mut app = AppState::new(&AppConfig::default());
        app.picker.start = date(2025, 3, 22);
        app.picker.end = date(2025, 3, 21);
        assert!(!app.request_fetch());
        assert_eq!(app.phase, Phase::Idle);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn second_request_while_fetching_is_ignored() {
        let mut app = AppState::new(&AppConfig::default());
        assert!(app.request_fetch());
        let pending = app.pending;
        app.picker.start = date(2025, 3, 20);
        assert!(!app.request_fetch());
        assert_eq!(app.pending, pending);
    }

    #[test]
    fn failure_returns_to_idle_with_history() {
        let mut app = AppState::new(&AppConfig::default());
        app.request_fetch();
        let range = app.pending.unwrap();
        app.complete_fetch(Err(RetrievalError::Vendor {
            operation: "fetch_bars",
            range,
            source: VendorError::Network("timed out".into()),
        }));
        assert_eq!(app.phase, Phase::Idle);
        assert!(app.display.is_none());
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.error_history[0].category, ErrorCategory::Network);
        assert!(app.error_history[0].context.starts_with("fetch_bars"));
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = AppState::new(&AppConfig::default());
        for i in 0..60 {
            app.push_error(ErrorCategory::Export, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn export_needs_displayed_data() {
        let mut app = AppState::new(&AppConfig::default());
        app.request_export();
        assert!(!app.export_requested);
        assert!(app.download_path().is_none());
    }
}
