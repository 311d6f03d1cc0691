//! Chart Model Module
//! Describes the four result charts: where each one mounts, what it plots and how it looks.

use crate::data::ChartSeries;
use serde::Serialize;

/// An sRGB colour shared by the interactive and the static renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const LOAD_COLOR: Rgb = Rgb(0, 0, 255); // blue
pub const RESPONSE_COLOR: Rgb = Rgb(0, 128, 0); // green
pub const SUCCESS_COLOR: Rgb = Rgb(0x4c, 0xaf, 0x50); // #4caf50
pub const FAIL_COLOR: Rgb = Rgb(0xf4, 0x43, 0x36); // #f44336
pub const REDIRECT_COLOR: Rgb = Rgb(255, 165, 0); // orange

/// The four charts of a results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    Load,
    ResponseTime,
    Outcome,
    Redirect,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Load,
        ChartKind::ResponseTime,
        ChartKind::Outcome,
        ChartKind::Redirect,
    ];

    /// Identifier of the surface this chart is drawn on.
    pub fn mount_id(self) -> &'static str {
        match self {
            ChartKind::Load => "loadChart",
            ChartKind::ResponseTime => "respChart",
            ChartKind::Outcome => "resultChart",
            ChartKind::Redirect => "redirChart",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Load => "Load Distribution",
            ChartKind::ResponseTime => "Response Time",
            ChartKind::Outcome => "Success / Failure",
            ChartKind::Redirect => "Redirections",
        }
    }

    /// Position in [`ChartKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ChartKind::Load => 0,
            ChartKind::ResponseTime => 1,
            ChartKind::Outcome => 2,
            ChartKind::Redirect => 3,
        }
    }
}

/// Values and fixed style of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Dataset {
    /// Unfilled line; `None` values leave a gap.
    Line {
        label: &'static str,
        values: Vec<Option<i64>>,
        color: Rgb,
    },
    Bar {
        label: &'static str,
        values: Vec<u8>,
        color: Rgb,
    },
    /// One slice per label.
    Pie { values: Vec<usize>, colors: Vec<Rgb> },
}

/// Everything needed to construct one chart on a mount point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
    pub show_x_axis: bool,
}

impl Chart {
    /// Build the chart of `kind` from derived series.
    pub fn from_series(kind: ChartKind, series: &ChartSeries) -> Self {
        match kind {
            ChartKind::Load => Self::time_chart(
                kind,
                series,
                Dataset::Line {
                    label: "Load Sent",
                    values: series.loads.clone(),
                    color: LOAD_COLOR,
                },
            ),
            ChartKind::ResponseTime => Self::time_chart(
                kind,
                series,
                Dataset::Line {
                    label: "Response Time (ms)",
                    values: series.response_times.clone(),
                    color: RESPONSE_COLOR,
                },
            ),
            ChartKind::Outcome => Chart {
                kind,
                labels: vec!["Success".to_string(), "Fail".to_string()],
                dataset: Dataset::Pie {
                    values: vec![series.success_count, series.fail_count],
                    colors: vec![SUCCESS_COLOR, FAIL_COLOR],
                },
                show_x_axis: true,
            },
            ChartKind::Redirect => Self::time_chart(
                kind,
                series,
                Dataset::Bar {
                    label: "Redirections",
                    values: series.redirect_flags.clone(),
                    color: REDIRECT_COLOR,
                },
            ),
        }
    }

    fn time_chart(kind: ChartKind, series: &ChartSeries, dataset: Dataset) -> Self {
        Chart {
            kind,
            labels: series.times.clone(),
            dataset,
            show_x_axis: false,
        }
    }

    /// All four charts, in [`ChartKind::ALL`] order.
    pub fn build_all(series: &ChartSeries) -> Vec<Chart> {
        ChartKind::ALL
            .iter()
            .map(|&kind| Chart::from_series(kind, series))
            .collect()
    }
}

/// Split a line series into runs of consecutive numeric points.
///
/// Each run is a list of `(row index, value)`; placeholders separate runs.
pub fn contiguous_runs(values: &[Option<i64>]) -> Vec<Vec<(usize, i64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push((i, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Y range covering every numeric value, padded so a flat line stays visible.
pub fn value_range(values: &[Option<i64>]) -> (f64, f64) {
    let mut numeric = values.iter().flatten().map(|&v| v as f64);
    let Some(first) = numeric.next() else {
        return (0.0, 1.0);
    };

    let (min, max) = numeric.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        return (min - 1.0, max + 1.0);
    }

    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Start angle and sweep (radians) of each pie slice, clockwise from 12 o'clock.
///
/// Empty when the total is zero.
pub fn pie_slices(values: &[usize]) -> Vec<(f64, f64)> {
    let total: usize = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    values
        .iter()
        .map(|&v| {
            let sweep = v as f64 / total as f64 * std::f64::consts::TAU;
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> ChartSeries {
        ChartSeries {
            times: vec!["t1".into(), "t2".into()],
            loads: vec![Some(10), Some(20)],
            response_times: vec![Some(120), Some(300)],
            redirect_flags: vec![0, 1],
            success_count: 1,
            fail_count: 1,
        }
    }

    #[test]
    fn mount_ids_are_fixed() {
        let ids: Vec<_> = ChartKind::ALL.iter().map(|k| k.mount_id()).collect();
        assert_eq!(ids, vec!["loadChart", "respChart", "resultChart", "redirChart"]);
        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn load_chart_style() {
        let chart = Chart::from_series(ChartKind::Load, &series());
        assert_eq!(chart.labels, vec!["t1", "t2"]);
        assert!(!chart.show_x_axis);
        assert_eq!(
            chart.dataset,
            Dataset::Line {
                label: "Load Sent",
                values: vec![Some(10), Some(20)],
                color: LOAD_COLOR,
            }
        );
    }

    #[test]
    fn response_chart_style() {
        let chart = Chart::from_series(ChartKind::ResponseTime, &series());
        assert!(matches!(
            chart.dataset,
            Dataset::Line { label: "Response Time (ms)", color: RESPONSE_COLOR, .. }
        ));
    }

    #[test]
    fn outcome_chart_is_success_fail_pie() {
        let chart = Chart::from_series(ChartKind::Outcome, &series());
        assert_eq!(chart.labels, vec!["Success", "Fail"]);
        assert_eq!(
            chart.dataset,
            Dataset::Pie {
                values: vec![1, 1],
                colors: vec![SUCCESS_COLOR, FAIL_COLOR],
            }
        );
    }

    #[test]
    fn redirect_chart_is_orange_bars() {
        let chart = Chart::from_series(ChartKind::Redirect, &series());
        assert_eq!(
            chart.dataset,
            Dataset::Bar {
                label: "Redirections",
                values: vec![0, 1],
                color: REDIRECT_COLOR,
            }
        );
    }

    #[test]
    fn build_all_follows_kind_order() {
        let kinds: Vec<_> = Chart::build_all(&series()).iter().map(|c| c.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
    }

    #[test]
    fn runs_break_at_placeholders() {
        let runs = contiguous_runs(&[Some(1), Some(2), None, None, Some(5), None, Some(7)]);
        assert_eq!(runs, vec![vec![(0, 1), (1, 2)], vec![(4, 5)], vec![(6, 7)]]);
        assert!(contiguous_runs(&[None, None]).is_empty());
    }

    #[test]
    fn value_range_pads() {
        assert_eq!(value_range(&[]), (0.0, 1.0));
        assert_eq!(value_range(&[None]), (0.0, 1.0));
        assert_eq!(value_range(&[Some(5), None]), (4.0, 6.0));
        let (lo, hi) = value_range(&[Some(0), Some(100)]);
        assert!(lo < 0.0 && hi > 100.0);
    }

    #[test]
    fn pie_slices_cover_full_turn() {
        let slices = pie_slices(&[3, 1]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].1 - std::f64::consts::TAU * 0.75).abs() < 1e-12);
        assert!((slices[1].0 - slices[0].1).abs() < 1e-12);
        let total: f64 = slices.iter().map(|s| s.1).sum();
        assert!((total - std::f64::consts::TAU).abs() < 1e-12);
        assert!(pie_slices(&[0, 0]).is_empty());
    }
}
