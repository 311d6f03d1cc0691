//! Data module - result set loading, row parsing and series derivation

mod loader;
mod processor;
mod row;

pub use loader::{ResultSource, SourceConfig};
pub use processor::{ChartSeries, DataProcessor};
pub use row::{RawResultRow, ResultRow};
