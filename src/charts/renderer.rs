//! Static Chart Renderer
//! Draws chart descriptions into PNG images with plotters.
//!
//! Layout per chart:
//! 1. Title: chart kind centered on top
//! 2. Line / bar charts: y axis with the dataset label, hidden x axis, legend top-right
//! 3. Pie chart: slices with "label (count)" captions and percentages

use crate::charts::model::{contiguous_runs, value_range, Chart, Dataset, Rgb};
use crate::error::RenderError;
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::path::Path;

/// Default output size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (800, 600);

const FONT: &str = "sans-serif";

fn plot_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Plot(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Time label for an x position, empty between rows.
fn label_at(labels: &[String], x: f64) -> String {
    if x < 0.0 || x.fract() != 0.0 {
        return String::new();
    }
    labels.get(x as usize).cloned().unwrap_or_default()
}

/// Text needs a system font; hosts without one cannot draw captions.
#[cfg(test)]
pub(crate) fn font_unavailable(err: &RenderError) -> bool {
    matches!(err, RenderError::Plot(msg) if msg.to_lowercase().contains("font"))
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to in-memory PNG bytes.
    pub fn render_png(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Plot(format!(
                "cannot render a {width}x{height} image"
            )));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, chart)?;
            root.present().map_err(plot_error)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Plot("bitmap buffer does not match size".to_string()))?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Render a chart and write it as a PNG file.
    pub fn render_to_file(
        chart: &Chart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let png = Self::render_png(chart, width, height)?;
        std::fs::write(path, png)?;
        Ok(())
    }

    /// Draw a chart onto any plotters drawing area.
    pub fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Chart,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(plot_error)?;

        match &chart.dataset {
            Dataset::Line {
                label,
                values,
                color,
            } => Self::draw_line(root, chart, label, values, rgb(*color)),
            Dataset::Bar {
                label,
                values,
                color,
            } => Self::draw_bars(root, chart, label, values, rgb(*color)),
            Dataset::Pie { values, colors } => Self::draw_pie(root, chart, values, colors),
        }
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Chart,
        label: &str,
        values: &[Option<i64>],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let (y_min, y_max) = value_range(values);
        let x_max = values.len().saturating_sub(1).max(1) as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.kind.title(), (FONT, 24))
            .margin(15)
            .x_label_area_size(if chart.show_x_axis { 40 } else { 0 })
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(plot_error)?;

        let formatter = |x: &f64| label_at(&chart.labels, *x);
        let mut mesh = ctx.configure_mesh();
        mesh.y_desc(label).x_label_formatter(&formatter);
        if !chart.show_x_axis {
            mesh.disable_x_axis().disable_x_mesh();
        }
        mesh.draw().map_err(plot_error)?;

        let runs = contiguous_runs(values);
        for (i, run) in runs.iter().enumerate() {
            let series = ctx
                .draw_series(LineSeries::new(
                    run.iter().map(|&(x, y)| (x as f64, y as f64)),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?;
            if i == 0 {
                series
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }

        // Point markers keep isolated values visible between gaps.
        ctx.draw_series(
            runs.iter()
                .flatten()
                .map(|&(x, y)| Circle::new((x as f64, y as f64), 3, color.filled())),
        )
        .map_err(plot_error)?;

        if !runs.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_error)?;
        }
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Chart,
        label: &str,
        values: &[u8],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let x_max = values.len().max(1) as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.kind.title(), (FONT, 24))
            .margin(15)
            .x_label_area_size(if chart.show_x_axis { 40 } else { 0 })
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max, 0f64..1.0)
            .map_err(plot_error)?;

        let formatter = |x: &f64| label_at(&chart.labels, x.floor());
        let mut mesh = ctx.configure_mesh();
        mesh.y_desc(label).x_label_formatter(&formatter);
        if !chart.show_x_axis {
            mesh.disable_x_axis().disable_x_mesh();
        }
        mesh.draw().map_err(plot_error)?;

        ctx.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, f64::from(v))], color.filled())
        }))
        .map_err(plot_error)?
        .label(label)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_error)?;
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Chart,
        values: &[usize],
        colors: &[Rgb],
    ) -> Result<(), RenderError> {
        let area = root
            .titled(chart.kind.title(), (FONT, 24))
            .map_err(plot_error)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);

        let total: usize = values.iter().sum();
        if total == 0 {
            let style = (FONT, 20)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new("No outcomes", center, style))
                .map_err(plot_error)?;
            return Ok(());
        }

        let radius = f64::from(w.min(h)) * 0.35;
        let sizes: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let slice_colors: Vec<RGBColor> = colors.iter().map(|&c| rgb(c)).collect();
        let labels: Vec<String> = chart
            .labels
            .iter()
            .zip(values)
            .map(|(label, count)| format!("{label} ({count})"))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &slice_colors, &labels);
        // First slice starts at 12 o'clock.
        pie.start_angle(-90.0);
        pie.label_style((FONT, 18).into_font().color(&BLACK));
        pie.percentages((FONT, 14).into_font().color(&WHITE));
        area.draw(&pie).map_err(plot_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::model::{ChartKind, FAIL_COLOR, LOAD_COLOR, REDIRECT_COLOR, SUCCESS_COLOR};
    use crate::data::ChartSeries;

    const SIZE: (u32, u32) = (400, 300);

    fn series() -> ChartSeries {
        ChartSeries {
            times: vec!["t1".into(), "t2".into(), "t3".into()],
            loads: vec![Some(10), None, Some(30)],
            response_times: vec![Some(120), Some(300), None],
            redirect_flags: vec![0, 1, 1],
            success_count: 2,
            fail_count: 1,
        }
    }

    /// Render and decode; `None` when the host has no usable font.
    fn render(chart: &Chart) -> Option<RgbImage> {
        match StaticChartRenderer::render_png(chart, SIZE.0, SIZE.1) {
            Ok(png) => Some(
                image::load_from_memory(&png)
                    .expect("png should decode")
                    .to_rgb8(),
            ),
            Err(err) if font_unavailable(&err) => None,
            Err(err) => panic!("rendering {:?} failed: {err}", chart.kind),
        }
    }

    fn has_color(image: &RgbImage, color: Rgb) -> bool {
        image.pixels().any(|p| p.0 == [color.0, color.1, color.2])
    }

    #[test]
    fn renders_every_chart_kind_at_requested_size() {
        let series = series();
        for kind in ChartKind::ALL {
            let Some(image) = render(&Chart::from_series(kind, &series)) else {
                return;
            };
            assert_eq!(image.dimensions(), SIZE, "{kind:?}");
        }
    }

    #[test]
    fn renders_every_chart_kind_from_empty_series() {
        let series = ChartSeries::default();
        for kind in ChartKind::ALL {
            let Some(image) = render(&Chart::from_series(kind, &series)) else {
                return;
            };
            assert_eq!(image.dimensions(), SIZE, "{kind:?}");
        }
    }

    #[test]
    fn line_with_gap_still_draws_its_points() {
        let chart = Chart::from_series(ChartKind::Load, &series());
        let Some(image) = render(&chart) else {
            return;
        };
        assert!(has_color(&image, LOAD_COLOR));
    }

    #[test]
    fn pie_draws_both_slices() {
        let chart = Chart::from_series(ChartKind::Outcome, &series());
        let Some(image) = render(&chart) else {
            return;
        };
        assert!(has_color(&image, SUCCESS_COLOR));
        assert!(has_color(&image, FAIL_COLOR));
    }

    #[test]
    fn pie_without_outcomes_draws_no_slices() {
        let chart = Chart::from_series(ChartKind::Outcome, &ChartSeries::default());
        let Some(image) = render(&chart) else {
            return;
        };
        assert!(!has_color(&image, SUCCESS_COLOR));
        assert!(!has_color(&image, FAIL_COLOR));
    }

    #[test]
    fn render_to_file_writes_png() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("redirChart.png");
        let chart = Chart::from_series(ChartKind::Redirect, &series());

        match StaticChartRenderer::render_to_file(&chart, &path, SIZE.0, SIZE.1) {
            Err(err) if font_unavailable(&err) => return,
            result => result.expect("render should succeed"),
        }
        let image = image::open(&path).expect("written file should decode");
        assert_eq!((image.width(), image.height()), SIZE);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let chart = Chart::from_series(ChartKind::Load, &series());
        assert!(matches!(
            StaticChartRenderer::render_png(&chart, 0, 300),
            Err(RenderError::Plot(_))
        ));
        assert!(matches!(
            StaticChartRenderer::render_png(&chart, 400, 0),
            Err(RenderError::Plot(_))
        ));
    }

    #[test]
    fn label_at_only_labels_row_positions() {
        let labels = vec!["t1".to_string(), "t2".to_string()];
        assert_eq!(label_at(&labels, 0.0), "t1");
        assert_eq!(label_at(&labels, 1.0), "t2");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 2.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }

    #[test]
    fn rgb_maps_channels() {
        let color = rgb(REDIRECT_COLOR);
        assert_eq!((color.0, color.1, color.2), (255, 165, 0));
    }

    #[test]
    fn plot_error_keeps_message() {
        let err: DrawingAreaErrorKind<std::io::Error> = DrawingAreaErrorKind::LayoutError;
        assert!(matches!(plot_error(err), RenderError::Plot(msg) if !msg.is_empty()));
    }
}
