pub mod browse_options;
pub mod history_options;
pub mod upload_options;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[clap(version, about = "Terminal client for the person detection service")]
pub struct RunOptions {
    #[clap(flatten)]
    pub global: GlobalOptions,

    #[clap(subcommand)]
    pub command: RunCommand,
}

#[derive(Args, Clone, Debug, Default)]
pub struct GlobalOptions {
    /// Base URL of the detection API. Takes precedence over NEXT_PUBLIC_API_URL
    /// and over the config file.
    #[clap(long, global = true)]
    pub api_url: Option<String>,

    /// Optional YAML config file with fallback values for the api url, environment,
    /// proxy and request timeout
    #[clap(long = "config", short('c'), global = true)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum RunCommand {
    /// Upload an image and print the detection result
    Upload(upload_options::UploadOptions),
    /// Print one page of detection history
    History(history_options::HistoryOptions),
    /// Print a single detection from history
    Show(ShowOptions),
    /// Page through detection history interactively
    Browse(browse_options::BrowseOptions),
    /// Check that the detection service is reachable
    Ping,
}

#[derive(Args, Clone, Debug)]
pub struct ShowOptions {
    /// The id of the detection
    pub id: i64,
}
