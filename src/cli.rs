use std::path::PathBuf;

use clap::Parser;

/// Fetch publications and citation stats from a Google Scholar profile and
/// refresh the portfolio's JSON data files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Scholar profile identifier (the `user=` value in the profile URL)
    #[arg(long, value_name = "ID")]
    pub scholar_id: String,

    /// Directory the JSON data files are written to
    #[arg(long, value_name = "DIR", default_value = "src/data")]
    pub output_dir: PathBuf,

    /// Route requests through this proxy (e.g. http://127.0.0.1:8080);
    /// on failure the fetch falls back to a direct connection
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,
}
