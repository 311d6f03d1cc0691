//! Control Panel Widget
//! Left side panel with data source, progress, result summary and export controls.

use crate::stats::{NumericStats, ResultSummary};
use egui::{Color32, RichText};

/// Export settings chosen in the panel
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub open_after_export: bool,
}

/// Left side control panel with source information and export controls.
pub struct ControlPanel {
    pub source: String,
    pub export: ExportSettings,
    pub summary: Option<ResultSummary>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(source: String, width: u32, height: u32) -> Self {
        Self {
            source,
            export: ExportSettings {
                width,
                height,
                open_after_export: true,
            },
            summary: None,
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 ESP Results")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Load test analysis")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(12.0).monospace());
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("⏳ Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Summary Section =====
        ui.label(RichText::new("📈 Summary").size(14.0).strong());
        ui.add_space(5.0);

        match &self.summary {
            Some(summary) => Self::draw_summary(ui, summary),
            None => {
                ui.label(RichText::new("No data yet").size(12.0).color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("💾 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(egui::DragValue::new(&mut self.export.width).range(200..=4000).suffix(" px"));
            ui.label("×");
            ui.add(egui::DragValue::new(&mut self.export.height).range(150..=3000).suffix(" px"));
        });
        ui.checkbox(&mut self.export.open_after_export, "Open folder after export");
        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG…").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        action
    }

    fn draw_summary(ui: &mut egui::Ui, summary: &ResultSummary) {
        egui::Grid::new("summary_table")
            .striped(true)
            .min_col_width(70.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                let mut row = |name: &str, value: String| {
                    ui.label(RichText::new(name).size(11.0).strong());
                    ui.label(RichText::new(value).size(11.0));
                    ui.end_row();
                };

                row("Rows", summary.total_rows.to_string());
                row("Success", summary.success_count.to_string());
                row("Fail", summary.fail_count.to_string());
                row("Other", summary.other_count.to_string());
                row("Redirected", summary.redirect_count.to_string());
                row(
                    "Success rate",
                    summary
                        .success_rate
                        .map(|r| format!("{:.1}%", r * 100.0))
                        .unwrap_or_else(|| "-".to_string()),
                );
                row("Load", format_stats(summary.load.as_ref(), ""));
                row("Response", format_stats(summary.response_time.as_ref(), " ms"));
                if summary.unparsed_loads + summary.unparsed_response_times > 0 {
                    row(
                        "Non-numeric",
                        format!(
                            "{} load, {} response",
                            summary.unparsed_loads, summary.unparsed_response_times
                        ),
                    );
                }
            });
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

fn format_stats(stats: Option<&NumericStats>, unit: &str) -> String {
    match stats {
        Some(s) => format!(
            "mean {:.1}{unit}\nmedian {:.1}{unit}\np95 {:.1}{unit}",
            s.mean, s.median, s.p95
        ),
        None => "-".to_string(),
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ExportPng,
}
