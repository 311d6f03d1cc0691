//! Stats module - result set summary statistics

mod calculator;

pub use calculator::{NumericStats, ResultSummary, StatsCalculator};
