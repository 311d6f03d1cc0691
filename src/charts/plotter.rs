//! Chart Plotter Module
//! Draws chart descriptions interactively using egui_plot.

use crate::charts::model::{contiguous_runs, pie_slices, Chart, Dataset, Rgb};
use egui::{Align2, Color32, FontId, Pos2, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Width reserved for the pie legend.
const PIE_LEGEND_WIDTH: f32 = 130.0;
/// Triangles per full pie turn.
const PIE_SEGMENTS: f64 = 128.0;

pub fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// Point on a circle, `angle` radians clockwise from 12 o'clock (screen coordinates).
fn point_on(center: Pos2, radius: f32, angle: f64) -> Pos2 {
    center + egui::vec2(radius * angle.sin() as f32, -radius * angle.cos() as f32)
}

/// Creates the result charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any chart at the given height.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &Chart, height: f32) {
        match &chart.dataset {
            Dataset::Line {
                label,
                values,
                color,
            } => Self::draw_line_chart(ui, chart, label, values, color32(*color), height),
            Dataset::Bar {
                label,
                values,
                color,
            } => Self::draw_bar_chart(ui, chart, label, values, color32(*color), height),
            Dataset::Pie { values, colors } => Self::draw_pie_chart(ui, chart, values, colors, height),
        }
    }

    /// Line over row index; hovering shows the timestamp of the nearest row.
    fn draw_line_chart(
        ui: &mut egui::Ui,
        chart: &Chart,
        label: &str,
        values: &[Option<i64>],
        color: Color32,
        height: f32,
    ) {
        let labels = chart.labels.clone();

        Plot::new(format!("line_{}", chart.kind.mount_id()))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .show_axes([chart.show_x_axis, true])
            .y_axis_label(label)
            .label_formatter(move |_name, point| {
                let idx = point.x.round();
                let time = if idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                };
                format!("{}\n{:.0}", time, point.y)
            })
            .show(ui, |plot_ui| {
                let runs = contiguous_runs(values);
                for run in &runs {
                    let points = PlotPoints::from_iter(run.iter().map(|&(x, y)| [x as f64, y as f64]));
                    plot_ui.line(Line::new(points).color(color).width(2.0).name(label));
                }

                let markers: PlotPoints = runs
                    .iter()
                    .flatten()
                    .map(|&(x, y)| [x as f64, y as f64])
                    .collect();
                plot_ui.points(Points::new(markers).radius(3.0).color(color));
            });
    }

    fn draw_bar_chart(
        ui: &mut egui::Ui,
        chart: &Chart,
        label: &str,
        values: &[u8],
        color: Color32,
        height: f32,
    ) {
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(i as f64, f64::from(v)).width(0.8).fill(color))
            .collect();

        Plot::new(format!("bar_{}", chart.kind.mount_id()))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .show_axes([chart.show_x_axis, true])
            .include_y(0.0)
            .include_y(1.0)
            .y_axis_label(label)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(label));
            });
    }

    /// Pie drawn with the painter; egui_plot has no pie primitive.
    fn draw_pie_chart(
        ui: &mut egui::Ui,
        chart: &Chart,
        values: &[usize],
        colors: &[Rgb],
        height: f32,
    ) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();

        let slices = pie_slices(values);
        if slices.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No outcomes",
                FontId::proportional(16.0),
                text_color,
            );
            return;
        }

        let pie_width = (rect.width() - PIE_LEGEND_WIDTH).max(rect.width() * 0.5);
        let center = egui::pos2(rect.left() + pie_width / 2.0, rect.center().y);
        let radius = (pie_width.min(rect.height()) * 0.45).max(1.0);
        let total: usize = values.iter().sum();

        for (&(start, sweep), (&value, &color)) in slices.iter().zip(values.iter().zip(colors)) {
            if value == 0 {
                continue;
            }
            let fill = color32(color);
            let steps = ((sweep / std::f64::consts::TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f64 / steps as f64;
                let a1 = start + sweep * (s + 1) as f64 / steps as f64;
                painter.add(Shape::convex_polygon(
                    vec![center, point_on(center, radius, a0), point_on(center, radius, a1)],
                    fill,
                    Stroke::NONE,
                ));
            }

            let share = value as f64 / total as f64 * 100.0;
            painter.text(
                point_on(center, radius * 0.6, start + sweep / 2.0),
                Align2::CENTER_CENTER,
                format!("{share:.1}%"),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }

        // Legend
        let mut y = rect.top() + 12.0;
        let x = rect.left() + pie_width + 8.0;
        for ((label, value), &color) in chart.labels.iter().zip(values).zip(colors) {
            let swatch = egui::Rect::from_min_size(egui::pos2(x, y - 7.0), egui::vec2(14.0, 14.0));
            painter.rect_filled(swatch, 3.0, color32(color));
            painter.text(
                egui::pos2(x + 20.0, y),
                Align2::LEFT_CENTER,
                format!("{label} ({value})"),
                FontId::proportional(13.0),
                text_color,
            );
            y += 22.0;
        }
    }
}
