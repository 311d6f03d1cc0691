//! Chart Viewer Widget
//! Central panel holding the four chart mount points in a 2x2 grid.

use crate::charts::{Chart, ChartKind, ChartPlotter};
use egui::{Color32, RichText, ScrollArea};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_CHROME: f32 = 70.0; // Title, mount id and margins
const MIN_PLOT_HEIGHT: f32 = 180.0;
const MIN_CARD_WIDTH: f32 = 320.0;

/// Four mount points, one per chart kind.
#[derive(Default)]
pub struct ChartViewer {
    slots: [Option<Chart>; 4],
    failed: bool,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a chart on its mount point, replacing nothing else.
    pub fn mount(&mut self, chart: Chart) {
        let idx = chart.kind.index();
        self.slots[idx] = Some(chart);
    }

    /// Drop every chart and show the failure placeholder.
    pub fn fail(&mut self) {
        self.slots = Default::default();
        self.failed = true;
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn mounted_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Mounted charts in kind order.
    pub fn charts(&self) -> Vec<Chart> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// Draw the four mount points
    pub fn show(&self, ui: &mut egui::Ui) {
        let card_width = ((ui.available_width() - CHART_SPACING) / 2.0 - 30.0).max(MIN_CARD_WIDTH);
        let plot_height =
            ((ui.available_height() - 3.0 * CHART_SPACING) / 2.0 - CARD_CHROME).max(MIN_PLOT_HEIGHT);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in ChartKind::ALL.chunks(2) {
                    ui.horizontal(|ui| {
                        for &kind in row {
                            self.draw_card(ui, kind, card_width, plot_height);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    /// Draw a single mount point card
    fn draw_card(&self, ui: &mut egui::Ui, kind: ChartKind, card_width: f32, plot_height: f32) {
        let chart = self.slots[kind.index()].as_ref();
        let border_color = match (chart, self.failed) {
            (Some(_), _) => Color32::from_rgb(40, 167, 69),
            (None, true) => Color32::from_rgb(220, 53, 69),
            (None, false) => ui.visuals().widgets.noninteractive.bg_stroke.color,
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(kind.title()).size(16.0).strong());
                        ui.label(RichText::new(format!("#{}", kind.mount_id())).size(11.0).weak());
                    });
                    ui.add_space(6.0);

                    match chart {
                        Some(chart) => ChartPlotter::draw_chart(ui, chart, plot_height),
                        None => {
                            let text = if self.failed {
                                "No Data"
                            } else {
                                "Waiting for data..."
                            };
                            ui.allocate_ui(egui::vec2(card_width, plot_height), |ui| {
                                ui.centered_and_justified(|ui| {
                                    ui.label(RichText::new(text).size(18.0));
                                });
                            });
                        }
                    }
                });
            });
    }
}
