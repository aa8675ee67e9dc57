//! nqview TUI: interactive dashboard over the retrieval core.
//!
//! Single screen:
//! - Date range row with start/end pickers capped at the last available date
//! - Candle chart with volume, summary statistics and raw rows once fetched
//! - Status bar, plus welcome, help and error history overlays

pub mod app;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod session;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use theme::Theme;
