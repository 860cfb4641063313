//! Command-line arguments
//!
//! Every flag can also come from a `SONGSCOPE_*` environment variable. Unset
//! flags fall through to the TOML file and then to compiled defaults.

use std::path::PathBuf;

use clap::Parser;
use songscope_common::config::Overrides;

/// Command-line arguments for songscope-dash
#[derive(Parser, Debug)]
#[command(name = "songscope-dash")]
#[command(about = "Interactive song feature correlation dashboard")]
#[command(version)]
pub struct Args {
    /// Config file (default: ~/.config/songscope/config.toml)
    #[arg(short, long, env = "SONGSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV data files
    #[arg(short, long, env = "SONGSCOPE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SONGSCOPE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SONGSCOPE_PORT")]
    pub port: Option<u16>,

    /// Maximum songs shown in the scatter plot
    #[arg(long, env = "SONGSCOPE_SAMPLE_SIZE")]
    pub sample_size: Option<usize>,

    /// Songs drawn per group for the explicit comparison
    #[arg(long, env = "SONGSCOPE_COMPARISON_SAMPLE_SIZE")]
    pub comparison_sample_size: Option<usize>,

    /// Collapse genres outside the allow-list into "Other"
    #[arg(long, env = "SONGSCOPE_NORMALIZE_GENRES", num_args = 0..=1, default_missing_value = "true")]
    pub normalize_genres: Option<bool>,

    /// Load and serve the comparison charts (default: true; needs explicit.csv,
    /// non_explicit.csv, popularity_correlation.csv and artist_stats.csv)
    #[arg(long, env = "SONGSCOPE_COMPARISONS", num_args = 0..=1, default_missing_value = "true")]
    pub comparisons: Option<bool>,

    /// Fixed sampling seed for reproducible sessions
    #[arg(long, env = "SONGSCOPE_SAMPLE_SEED")]
    pub sample_seed: Option<u64>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "SONGSCOPE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            host: self.host.clone(),
            port: self.port,
            sample_size: self.sample_size,
            comparison_sample_size: self.comparison_sample_size,
            normalize_genres: self.normalize_genres,
            comparisons: self.comparisons,
            sample_seed: self.sample_seed,
            log_level: self.log_level.clone(),
        }
    }
}
