//! Typed row view of a normalized OHLCV result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bucket for the configured instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts_event: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Close at or above open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// Returns true if any price field is NaN (vendor left a null).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar(open: f64, close: f64) -> Bar {
        Bar {
            ts_event: Utc.with_ymd_and_hms(2025, 3, 21, 9, 30, 0).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn flat_bar_counts_as_up() {
        assert!(sample_bar(100.0, 100.0).is_up());
        assert!(!sample_bar(101.0, 100.0).is_up());
    }

    #[test]
    fn nan_price_is_void() {
        let mut bar = sample_bar(100.0, 101.0);
        assert!(!bar.is_void());
        bar.low = f64::NAN;
        assert!(bar.is_void());
    }
}
