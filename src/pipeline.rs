//! Results pipeline: fetch → parse → derive → render, run once per invocation.

use crate::charts::{Chart, ChartKind, StaticChartRenderer};
use crate::data::{ChartSeries, DataProcessor, ResultRow, ResultSource};
use crate::error::{PipelineError, RenderError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A surface one chart is drawn on.
pub trait MountPoint {
    fn mount(&mut self, chart: Chart) -> Result<(), RenderError>;
}

/// Maps each chart kind to its mount point.
pub trait MountResolver {
    type Point: MountPoint + Send;

    fn resolve(&self, kind: ChartKind) -> Result<Self::Point, RenderError>;
}

/// Fetch the result set from `source` and draw the four charts on `mounts`.
///
/// All-or-nothing up to drawing: a fetch failure or an unresolvable mount
/// returns before any chart is mounted.
pub fn render_results<S, R>(source: &S, mounts: &R) -> Result<ChartSeries, PipelineError>
where
    S: ResultSource + ?Sized,
    R: MountResolver,
{
    let origin = source.describe();
    let raw = source.fetch().inspect_err(|err| {
        error!(source = %origin, error = %err, "failed to fetch result set");
    })?;
    info!(source = %origin, rows = raw.len(), "fetched result set");

    let rows: Vec<ResultRow> = raw.iter().map(ResultRow::from_raw).collect();
    let series = DataProcessor::derive_series(&rows);
    debug!(
        rows = series.len(),
        success = series.success_count,
        fail = series.fail_count,
        redirects = series.redirect_count(),
        "derived chart series"
    );

    mount_charts(Chart::build_all(&series), mounts)?;
    info!("rendered {} charts", ChartKind::ALL.len());
    Ok(series)
}

/// Resolve every mount first, then mount the charts in parallel.
pub fn mount_charts<R: MountResolver>(charts: Vec<Chart>, mounts: &R) -> Result<(), RenderError> {
    let targets = charts
        .into_iter()
        .map(|chart| mounts.resolve(chart.kind).map(|point| (point, chart)))
        .collect::<Result<Vec<_>, _>>()?;

    targets.into_par_iter().try_for_each(|(mut point, chart)| {
        let mount_id = chart.kind.mount_id();
        point.mount(chart)?;
        debug!(mount = mount_id, "chart mounted");
        Ok(())
    })
}

/// Mounts every chart as `<dir>/<mount id>.png`.
#[derive(Debug, Clone)]
pub struct DirectoryMounts {
    dir: PathBuf,
    width: u32,
    height: u32,
}

impl DirectoryMounts {
    pub fn new(dir: impl AsRef<Path>, width: u32, height: u32) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            width,
            height,
        }
    }

    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.dir.join(format!("{}.png", kind.mount_id()))
    }
}

impl MountResolver for DirectoryMounts {
    type Point = FileMount;

    fn resolve(&self, kind: ChartKind) -> Result<FileMount, RenderError> {
        std::fs::create_dir_all(&self.dir)?;
        if !self.dir.is_dir() {
            return Err(RenderError::MountUnavailable(kind.mount_id().to_string()));
        }
        Ok(FileMount {
            path: self.path_for(kind),
            width: self.width,
            height: self.height,
        })
    }
}

/// One PNG file target.
#[derive(Debug)]
pub struct FileMount {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl MountPoint for FileMount {
    fn mount(&mut self, chart: Chart) -> Result<(), RenderError> {
        StaticChartRenderer::render_to_file(&chart, &self.path, self.width, self.height)
    }
}
