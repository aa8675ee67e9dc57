//! Widgets shown once a fetch has completed.
//!
//! - CandleChart: OHLC candles with a volume strip
//! - SummaryTable: Min/Max/Mean per numeric column
//! - RawTable: scrollable raw rows

pub mod candle_chart;
pub mod raw_table;
pub mod summary_table;

pub use candle_chart::CandleChartPanel;
pub use raw_table::RawTablePanel;
pub use summary_table::SummaryTablePanel;
