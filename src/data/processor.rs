//! Data Processor Module
//! Derives the row-aligned per-chart series from a result set.

use crate::data::row::{Outcome, ResultRow};
use serde::Serialize;

/// Per-chart series derived from one result set.
///
/// `times`, `loads`, `response_times` and `redirect_flags` are aligned with
/// the input rows; the two counts only cover exact success/fail outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub times: Vec<String>,
    pub loads: Vec<Option<i64>>,
    pub response_times: Vec<Option<i64>>,
    pub redirect_flags: Vec<u8>,
    pub success_count: usize,
    pub fail_count: usize,
}

impl ChartSeries {
    /// Number of rows the series were derived from.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Rows whose outcome was neither success nor fail.
    pub fn unclassified_count(&self) -> usize {
        self.len()
            .saturating_sub(self.success_count)
            .saturating_sub(self.fail_count)
    }

    pub fn redirect_count(&self) -> usize {
        self.redirect_flags.iter().filter(|&&flag| flag == 1).count()
    }
}

/// Handles the transformation from rows to chart series.
pub struct DataProcessor;

impl DataProcessor {
    /// Derive all series in a single pass, preserving row order.
    pub fn derive_series(rows: &[ResultRow]) -> ChartSeries {
        let mut series = ChartSeries {
            times: Vec::with_capacity(rows.len()),
            loads: Vec::with_capacity(rows.len()),
            response_times: Vec::with_capacity(rows.len()),
            redirect_flags: Vec::with_capacity(rows.len()),
            success_count: 0,
            fail_count: 0,
        };

        for row in rows {
            series.times.push(row.timestamp.clone());
            series.loads.push(row.load);
            series.response_times.push(row.response_time_ms);
            series.redirect_flags.push(u8::from(row.redirected));

            match row.outcome {
                Outcome::Success => series.success_count += 1,
                Outcome::Fail => series.fail_count += 1,
                Outcome::Other(_) => {}
            }
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row::RawResultRow;

    fn rows(raw: &[RawResultRow]) -> Vec<ResultRow> {
        raw.iter().map(ResultRow::from_raw).collect()
    }

    #[test]
    fn two_row_example() {
        let input = rows(&[
            RawResultRow::from_text("t1", "10", "success", "120", ""),
            RawResultRow::from_text("t2", "20", "fail", "300", "http://x"),
        ]);
        let series = DataProcessor::derive_series(&input);

        assert_eq!(series.times, vec!["t1", "t2"]);
        assert_eq!(series.loads, vec![Some(10), Some(20)]);
        assert_eq!(series.response_times, vec![Some(120), Some(300)]);
        assert_eq!(series.redirect_flags, vec![0, 1]);
        assert_eq!(series.success_count, 1);
        assert_eq!(series.fail_count, 1);
    }

    #[test]
    fn unknown_outcome_is_only_excluded_from_counts() {
        let input = rows(&[
            RawResultRow::from_text("t1", "10", "success", "120", ""),
            RawResultRow::from_text("t2", "30", "timeout", "5000", "10.0.0.2:5001"),
        ]);
        let series = DataProcessor::derive_series(&input);

        assert_eq!(series.success_count + series.fail_count, 1);
        assert_eq!(series.unclassified_count(), 1);
        assert_eq!(series.loads[1], Some(30));
        assert_eq!(series.response_times[1], Some(5000));
        assert_eq!(series.redirect_flags[1], 1);
    }

    #[test]
    fn non_numeric_load_does_not_stop_derivation() {
        let input = rows(&[
            RawResultRow::from_text("t1", "abc", "success", "100", ""),
            RawResultRow::from_text("t2", "40", "success", "oops", ""),
            RawResultRow::from_text("t3", "50", "fail", "200", ""),
        ]);
        let series = DataProcessor::derive_series(&input);

        assert_eq!(series.loads, vec![None, Some(40), Some(50)]);
        assert_eq!(series.response_times, vec![Some(100), None, Some(200)]);
        assert_eq!(series.success_count, 2);
        assert_eq!(series.fail_count, 1);
    }

    #[test]
    fn series_are_row_aligned() {
        let labels = ["success", "fail", "timeout", "success", ""];
        let raw: Vec<RawResultRow> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let redirected = if i % 2 == 0 { "" } else { "peer" };
                RawResultRow::from_text(&format!("t{i}"), &i.to_string(), label, "7", redirected)
            })
            .collect();
        let input = rows(&raw);
        let series = DataProcessor::derive_series(&input);

        assert_eq!(series.len(), input.len());
        assert_eq!(series.loads.len(), input.len());
        assert_eq!(series.response_times.len(), input.len());
        assert_eq!(series.redirect_flags.len(), input.len());
        assert!(series.success_count + series.fail_count <= input.len());
        assert_eq!(series.redirect_flags, vec![0, 1, 0, 1, 0]);
        assert_eq!(series.redirect_count(), 2);
    }

    #[test]
    fn counts_cover_all_rows_when_every_outcome_is_known() {
        let input = rows(&[
            RawResultRow::from_text("a", "1", "fail", "1", ""),
            RawResultRow::from_text("b", "1", "fail", "1", ""),
            RawResultRow::from_text("c", "1", "success", "1", ""),
        ]);
        let series = DataProcessor::derive_series(&input);
        assert_eq!(series.success_count + series.fail_count, input.len());
        assert_eq!(series.unclassified_count(), 0);
    }

    #[test]
    fn derivation_is_pure() {
        let input = rows(&[
            RawResultRow::from_text("t1", "10", "success", "120", ""),
            RawResultRow::from_text("t2", "x", "other", "300", "y"),
        ]);
        let before = input.clone();
        let first = DataProcessor::derive_series(&input);
        let second = DataProcessor::derive_series(&input);
        assert_eq!(first, second);
        assert_eq!(input, before);
    }

    #[test]
    fn empty_result_set() {
        let series = DataProcessor::derive_series(&[]);
        assert!(series.is_empty());
        assert_eq!(series.success_count, 0);
        assert_eq!(series.fail_count, 0);
    }

    #[test]
    fn unclassified_count_never_underflows() {
        let series = ChartSeries {
            times: vec!["t1".into()],
            success_count: 2,
            fail_count: 1,
            ..ChartSeries::default()
        };
        assert_eq!(series.unclassified_count(), 0);
    }
}
