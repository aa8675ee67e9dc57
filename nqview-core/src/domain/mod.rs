//! Domain types: query windows, instrument descriptor, schema names, bars.

pub mod bar;
pub mod instrument;
pub mod range;

pub use bar::Bar;
pub use instrument::{DataKind, Instrument, Schema};
pub use range::{RangeError, TimeRange};
