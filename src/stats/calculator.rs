//! Statistics Calculator Module
//! Summarizes a derived result set: outcome counts and latency / load statistics.

use crate::data::ChartSeries;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

/// Percentile reported alongside mean and median.
pub const TAIL_PERCENTILE: f64 = 95.0;

/// Descriptive statistics over the numeric values of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary of one result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub total_rows: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub other_count: usize,
    pub redirect_count: usize,
    /// Successes over success + fail; `None` when no row was classified.
    pub success_rate: Option<f64>,
    pub load: Option<NumericStats>,
    pub response_time: Option<NumericStats>,
    /// Positions holding a non-numeric placeholder.
    pub unparsed_loads: usize,
    pub unparsed_response_times: usize,
}

/// Handles statistical calculations over derived series.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn summarize(series: &ChartSeries) -> ResultSummary {
        let classified = series.success_count + series.fail_count;
        let success_rate =
            (classified > 0).then(|| series.success_count as f64 / classified as f64);

        let loads = Self::numeric_values(&series.loads);
        let response_times = Self::numeric_values(&series.response_times);

        ResultSummary {
            total_rows: series.len(),
            success_count: series.success_count,
            fail_count: series.fail_count,
            other_count: series.unclassified_count(),
            redirect_count: series.redirect_count(),
            success_rate,
            load: Self::compute_descriptive_stats(&loads),
            response_time: Self::compute_descriptive_stats(&response_times),
            unparsed_loads: series.loads.len() - loads.len(),
            unparsed_response_times: series.response_times.len() - response_times.len(),
        }
    }

    /// Numeric values of a series, placeholders dropped.
    fn numeric_values(values: &[Option<i64>]) -> Vec<f64> {
        values.iter().flatten().map(|&v| v as f64).collect()
    }

    /// Compute descriptive statistics; `None` for an empty slice.
    pub fn compute_descriptive_stats(values: &[f64]) -> Option<NumericStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let std = if values.len() > 1 {
            Statistics::std_dev(values)
        } else {
            0.0
        };

        Some(NumericStats {
            count: values.len(),
            mean: Statistics::mean(values),
            median: Data::new(sorted.clone()).median(),
            std,
            p95: Self::percentile(&sorted, TAIL_PERCENTILE),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
