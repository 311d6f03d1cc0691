//! ESP Results Viewer - Load-test result fetcher & chart viewer
//!
//! Fetches the results collected by ESP simulator runs and renders four charts:
//! load over time, response time over time, success/fail share and redirections.

mod charts;
mod config;
mod data;
mod error;
mod gui;
mod pipeline;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Command, DEFAULT_LOG_FILTER};
use data::{ChartSeries, SourceConfig};
use eframe::egui;
use gui::ResultsApp;
use pipeline::{render_results, DirectoryMounts};
use serde::Serialize;
use stats::{ResultSummary, StatsCalculator};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// JSON document printed by the `summary` command
#[derive(Serialize)]
struct SummaryReport<'a> {
    source: String,
    summary: ResultSummary,
    series: &'a ChartSeries,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = cli.source.source_config();

    match cli.command.unwrap_or_default() {
        Command::View { width, height } => run_viewer(source, (width, height)),
        Command::Export {
            out_dir,
            width,
            height,
        } => run_export(&source, &out_dir, width, height),
        Command::Summary { pretty } => run_summary(&source, pretty),
    }
}

fn run_viewer(source: SourceConfig, export_size: (u32, u32)) -> Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("ESP Results"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ESP Results",
        options,
        Box::new(move |cc| Ok(Box::new(ResultsApp::new(cc, source, export_size)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

fn run_export(source: &SourceConfig, out_dir: &Path, width: u32, height: u32) -> Result<()> {
    let results = source
        .open()
        .with_context(|| format!("cannot open {source}"))?;
    let mounts = DirectoryMounts::new(out_dir, width, height);

    let series = render_results(&*results, &mounts)
        .with_context(|| format!("rendering results from {source} failed"))?;

    if series.is_empty() {
        warn!(source = %source, "result set is empty, charts have no data points");
    }
    info!(
        rows = series.len(),
        dir = %out_dir.display(),
        "wrote charts"
    );
    Ok(())
}

fn run_summary(source: &SourceConfig, pretty: bool) -> Result<()> {
    let results = source
        .open()
        .with_context(|| format!("cannot open {source}"))?;
    let raw = results
        .fetch()
        .with_context(|| format!("fetching results from {source} failed"))?;

    let rows: Vec<data::ResultRow> = raw.iter().map(data::ResultRow::from_raw).collect();
    let series = data::DataProcessor::derive_series(&rows);
    let report = SummaryReport {
        source: source.to_string(),
        summary: StatsCalculator::summarize(&series),
        series: &series,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
