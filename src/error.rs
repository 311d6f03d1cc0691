//! Error types for fetching, rendering and the pipeline that ties them together.

use thiserror::Error;

/// Failure to obtain the result set from its source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Malformed results body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] polars::prelude::PolarsError),
    #[error("CSV is missing column '{0}'")]
    MissingColumn(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to draw a chart onto its mount point.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Plot error: {0}")]
    Plot(String),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Mount point '{0}' is unavailable")]
    MountUnavailable(String),
}

/// Any failure of a single fetch → derive → render run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
