//! ESP Results Main Application
//! Main window with control panel and the four chart mount points.

use crate::charts::{Chart, ChartKind};
use crate::data::SourceConfig;
use crate::error::{PipelineError, RenderError};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{mount_charts, render_results, DirectoryMounts, MountPoint, MountResolver};
use crate::stats::{ResultSummary, StatsCalculator};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{info, warn};

/// Pipeline messages from the background thread
pub enum LoadResult {
    Progress(String),
    Mounted(Chart),
    Complete(ResultSummary),
    Error(String),
}

/// Resolves every chart kind to the viewer, across the thread boundary.
pub struct ChannelMounts {
    tx: Sender<LoadResult>,
}

impl ChannelMounts {
    pub fn new(tx: Sender<LoadResult>) -> Self {
        Self { tx }
    }
}

pub struct ChannelMount {
    kind: ChartKind,
    tx: Sender<LoadResult>,
}

impl MountResolver for ChannelMounts {
    type Point = ChannelMount;

    fn resolve(&self, kind: ChartKind) -> Result<ChannelMount, RenderError> {
        Ok(ChannelMount {
            kind,
            tx: self.tx.clone(),
        })
    }
}

impl MountPoint for ChannelMount {
    fn mount(&mut self, chart: Chart) -> Result<(), RenderError> {
        self.tx
            .send(LoadResult::Mounted(chart))
            .map_err(|_| RenderError::MountUnavailable(self.kind.mount_id().to_string()))
    }
}

/// Main application window.
pub struct ResultsApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async pipeline
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ResultsApp {
    /// Create the window and start the one-shot fetch.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: SourceConfig,
        export_size: (u32, u32),
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(source.to_string(), export_size.0, export_size.1),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(source);
        app
    }

    /// Run the pipeline in a background thread
    fn start_loading(&mut self, source: SourceConfig) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_progress(5.0, "Fetching results...");

        thread::spawn(move || {
            Self::run_pipeline(tx, source);
        });
    }

    /// Run pipeline (called from background thread)
    fn run_pipeline(tx: Sender<LoadResult>, source: SourceConfig) {
        let _ = tx.send(LoadResult::Progress(format!("Fetching {source}...")));

        let outcome = source
            .open()
            .map_err(PipelineError::from)
            .and_then(|source| render_results(&*source, &ChannelMounts::new(tx.clone())));

        match outcome {
            Ok(series) => {
                let _ = tx.send(LoadResult::Complete(StatsCalculator::summarize(&series)));
            }
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
            }
        }
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(10.0, &status);
                    }
                    LoadResult::Mounted(chart) => {
                        self.chart_viewer.mount(chart);
                        let mounted = self.chart_viewer.mounted_count();
                        self.control_panel.set_progress(
                            20.0 + mounted as f32 * 20.0,
                            &format!("Rendering charts {}/{}...", mounted, ChartKind::ALL.len()),
                        );
                    }
                    LoadResult::Complete(summary) => {
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Complete! {} rows, 4 charts ready", summary.total_rows),
                        );
                        self.control_panel.summary = Some(summary);
                        self.control_panel.export_enabled = self.chart_viewer.is_complete();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.chart_viewer.fail();
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Handle PNG export - render the mounted charts into a chosen folder
    fn handle_export_png(&mut self) {
        if !self.chart_viewer.is_complete() {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        }

        // Ask user for output location
        let Some(folder) = rfd::FileDialog::new()
            .set_title("Export charts")
            .pick_folder()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering PNG files...");
        let settings = self.control_panel.export.clone();
        let mounts = DirectoryMounts::new(&folder, settings.width, settings.height);

        match mount_charts(self.chart_viewer.charts(), &mounts) {
            Ok(()) => {
                info!(folder = %folder.display(), "exported charts");
                self.control_panel.set_progress(
                    100.0,
                    &format!("Complete! Exported 4 charts to {}", folder.display()),
                );
                if settings.open_after_export {
                    if let Err(e) = open::that(&folder) {
                        warn!(error = %e, "could not open export folder");
                    }
                }
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: export failed: {}", e));
            }
        }
    }
}

impl eframe::App for ResultsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart mount points
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn drain(rx: &Receiver<LoadResult>) -> Vec<LoadResult> {
        rx.try_iter().collect()
    }

    #[test]
    fn channel_mount_forwards_chart() {
        let (tx, rx) = channel();
        let mounts = ChannelMounts::new(tx);
        let mut point = mounts.resolve(ChartKind::Outcome).expect("resolve");
        point
            .mount(Chart::from_series(ChartKind::Outcome, &Default::default()))
            .expect("mount");

        let messages = drain(&rx);
        assert_eq!(messages.len(), 1);
        assert!(matches!(&messages[0], LoadResult::Mounted(c) if c.kind == ChartKind::Outcome));
    }

    #[test]
    fn channel_mount_fails_when_viewer_is_gone() {
        let (tx, rx) = channel();
        drop(rx);
        let mut point = ChannelMounts::new(tx).resolve(ChartKind::Load).expect("resolve");
        let err = point
            .mount(Chart::from_series(ChartKind::Load, &Default::default()))
            .unwrap_err();
        assert!(matches!(err, RenderError::MountUnavailable(id) if id == "loadChart"));
    }

    #[test]
    fn pipeline_from_csv_sends_four_charts_then_summary() {
        let dir = tempdir().expect("tempdir should be created");
        let path = dir.path().join("esp_results.csv");
        std::fs::write(
            &path,
            "timestamp,load,result,response_time_ms,redirected\n\
             t1,10,success,120,\n\
             t2,20,fail,300,http://x\n",
        )
        .expect("write csv");

        let (tx, rx) = channel();
        ResultsApp::run_pipeline(tx, SourceConfig::Csv { path });

        let messages = drain(&rx);
        let mounted = messages
            .iter()
            .filter(|m| matches!(m, LoadResult::Mounted(_)))
            .count();
        assert_eq!(mounted, 4);
        match messages.last() {
            Some(LoadResult::Complete(summary)) => {
                assert_eq!(summary.total_rows, 2);
                assert_eq!(summary.success_count, 1);
                assert_eq!(summary.fail_count, 1);
            }
            _ => panic!("last message should be the summary"),
        }
    }

    #[test]
    fn pipeline_failure_sends_only_error() {
        let (tx, rx) = channel();
        ResultsApp::run_pipeline(
            tx,
            SourceConfig::Csv {
                path: "/nonexistent/esp_results.csv".into(),
            },
        );

        let messages = drain(&rx);
        assert!(!messages.iter().any(|m| matches!(m, LoadResult::Mounted(_))));
        assert!(matches!(messages.last(), Some(LoadResult::Error(_))));
    }
}
