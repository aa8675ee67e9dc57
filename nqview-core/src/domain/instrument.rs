//! Instrument descriptor and vendor schema names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The single instrument this system reads. Fixed by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrument {
    /// Vendor dataset code, e.g. `GLBX.MDP3` for CME Globex.
    pub dataset: String,
    /// Raw vendor symbol, e.g. `NQM5`.
    pub symbol: String,
    pub description: String,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            dataset: "GLBX.MDP3".into(),
            symbol: "NQM5".into(),
            description: "E-mini NASDAQ-100 Futures (June 2025)".into(),
        }
    }
}

/// Vendor schema identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schema {
    #[serde(rename = "ohlcv-1s")]
    Ohlcv1s,
    #[serde(rename = "ohlcv-1m")]
    Ohlcv1m,
    #[serde(rename = "ohlcv-1h")]
    Ohlcv1h,
    #[serde(rename = "ohlcv-1d")]
    Ohlcv1d,
    #[serde(rename = "trades")]
    Trades,
    #[serde(rename = "mbp-10")]
    Mbp10,
    #[serde(rename = "definition")]
    Definition,
}

impl Schema {
    pub fn as_str(self) -> &'static str {
        match self {
            Schema::Ohlcv1s => "ohlcv-1s",
            Schema::Ohlcv1m => "ohlcv-1m",
            Schema::Ohlcv1h => "ohlcv-1h",
            Schema::Ohlcv1d => "ohlcv-1d",
            Schema::Trades => "trades",
            Schema::Mbp10 => "mbp-10",
            Schema::Definition => "definition",
        }
    }

    pub fn is_ohlcv(self) -> bool {
        matches!(
            self,
            Schema::Ohlcv1s | Schema::Ohlcv1m | Schema::Ohlcv1h | Schema::Ohlcv1d
        )
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a fetched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Bars,
    Trades,
    Depth,
    Reference,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [
        DataKind::Bars,
        DataKind::Trades,
        DataKind::Depth,
        DataKind::Reference,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DataKind::Bars => "OHLCV",
            DataKind::Trades => "trade",
            DataKind::Depth => "MBP-10",
            DataKind::Reference => "definition",
        }
    }

    /// Whether results of this kind carry the event-timestamp index.
    pub fn is_time_indexed(self) -> bool {
        !matches!(self, DataKind::Reference)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bars" | "ohlcv" => Ok(DataKind::Bars),
            "trades" => Ok(DataKind::Trades),
            "depth" | "mbp" | "mbp-10" => Ok(DataKind::Depth),
            "reference" | "definition" => Ok(DataKind::Reference),
            other => Err(format!(
                "unknown data kind '{other}'. Valid: bars, trades, depth, reference"
            )),
        }
    }
}
