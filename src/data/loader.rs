//! Result Set Loader Module
//! Fetches raw result rows from the results endpoint or from a results CSV file.

use crate::data::row::RawResultRow;
use crate::error::FetchError;
use polars::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Path of the results endpoint on an edge server.
pub const RESULTS_PATH: &str = "/esp_results";

/// Columns every results CSV must carry.
pub const RESULT_COLUMNS: [&str; 5] = [
    "timestamp",
    "load",
    "result",
    "response_time_ms",
    "redirected",
];

/// A one-shot provider of the raw result set.
pub trait ResultSource {
    /// Fetch the whole result set. No retry, no partial results.
    fn fetch(&self) -> Result<Vec<RawResultRow>, FetchError>;

    /// Human readable origin, used in logs and the viewer status line.
    fn describe(&self) -> String;
}

/// Where to load results from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Http { base_url: String },
    Csv { path: PathBuf },
}

impl SourceConfig {
    /// Build the source this configuration names.
    pub fn open(&self) -> Result<Box<dyn ResultSource + Send>, FetchError> {
        match self {
            SourceConfig::Http { base_url } => Ok(Box::new(HttpSource::new(base_url)?)),
            SourceConfig::Csv { path } => Ok(Box::new(CsvFileSource::new(path))),
        }
    }
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceConfig::Http { base_url } => write!(f, "{}", results_url(base_url)),
            SourceConfig::Csv { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Join a base URL and the results endpoint path.
pub fn results_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), RESULTS_PATH)
}

/// `GET {base_url}/esp_results` over HTTP.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        // The request waits as long as the server takes.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .user_agent(format!("esp-results/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: results_url(base_url),
        })
    }
}

impl ResultSource for HttpSource {
    fn fetch(&self) -> Result<Vec<RawResultRow>, FetchError> {
        debug!(url = %self.url, "requesting result set");
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text()?;
        let rows: Vec<RawResultRow> = serde_json::from_str(&body)?;
        debug!(rows = rows.len(), bytes = body.len(), "decoded result set");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the simulator's results CSV directly using Polars.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_dataframe(&self) -> Result<DataFrame, FetchError> {
        // Schema inference is disabled so that every column stays text.
        let df = LazyCsvReader::new(&self.path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }
}

/// Extract one text column; empty cells come back as empty strings.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, FetchError> {
    let column = df
        .column(name)
        .map_err(|_| FetchError::MissingColumn(name.to_string()))?;
    let values = column.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

impl ResultSource for CsvFileSource {
    fn fetch(&self) -> Result<Vec<RawResultRow>, FetchError> {
        if !self.path.is_file() {
            return Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", self.path.display()),
            )));
        }

        let df = self.load_dataframe()?;
        let [timestamps, loads, results, response_times, redirects] =
            RESULT_COLUMNS.map(|name| text_column(&df, name));
        let (timestamps, loads, results, response_times, redirects) = (
            timestamps?,
            loads?,
            results?,
            response_times?,
            redirects?,
        );

        let rows: Vec<RawResultRow> = (0..df.height())
            .map(|i| {
                RawResultRow::from_text(
                    &timestamps[i],
                    &loads[i],
                    &results[i],
                    &response_times[i],
                    &redirects[i],
                )
            })
            .collect();

        debug!(path = %self.path.display(), rows = rows.len(), "read results CSV");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
