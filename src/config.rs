//! Command line configuration.

use crate::charts::DEFAULT_SIZE;
use crate::data::SourceConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Edge server the results are fetched from when nothing else is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "esp_results_viewer=info";

#[derive(Parser, Debug)]
#[command(name = "esp-results")]
#[command(about = "Fetch ESP simulator load-test results and chart them")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Base URL of the edge server exposing /esp_results
    #[arg(long, env = "ESP_RESULTS_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Read results from a simulator CSV file instead of over HTTP
    #[arg(long, value_name = "FILE", conflicts_with = "base_url")]
    pub csv: Option<PathBuf>,
}

impl SourceArgs {
    pub fn source_config(&self) -> SourceConfig {
        match &self.csv {
            Some(path) => SourceConfig::Csv { path: path.clone() },
            None => SourceConfig::Http {
                base_url: self.base_url.clone(),
            },
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the chart viewer window (default)
    ///
    /// `--width` and `--height` set the initial size of PNGs exported from the window.
    View {
        /// Initial export width in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.0, value_parser = clap::value_parser!(u32).range(200..=4000))]
        width: u32,

        /// Initial export height in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.1, value_parser = clap::value_parser!(u32).range(150..=3000))]
        height: u32,
    },

    /// Render the four charts as PNG files
    Export {
        /// Directory receiving <mount id>.png files
        #[arg(short, long, default_value = "./esp-charts")]
        out_dir: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.0, value_parser = clap::value_parser!(u32).range(200..=4000))]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value_t = DEFAULT_SIZE.1, value_parser = clap::value_parser!(u32).range(150..=3000))]
        height: u32,
    },

    /// Print the derived series and summary statistics as JSON
    Summary {
        /// Pretty-print the JSON document
        #[arg(long)]
        pretty: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::View {
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
        }
    }
}
