//! Configuration loading and resolution
//!
//! Every setting is resolved in priority order:
//! 1. Command-line flag (highest priority)
//! 2. Environment variable (both handled by the binary's argument parser)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; a config file that does not parse
//! is.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::sampler::{DEFAULT_COMPARISON_SAMPLE_SIZE, DEFAULT_SAMPLE_SIZE};
use crate::{Error, Result};

/// Default HTTP port for the dashboard
pub const DEFAULT_PORT: u16 = 5780;
/// Default bind host (local only)
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default log level when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Names of the data files inside the data directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub correlation: String,
    pub songs: String,
    pub explicit: String,
    pub non_explicit: String,
    pub popularity_correlation: String,
    pub artist_stats: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            correlation: "corr10.csv".to_string(),
            songs: "song.csv".to_string(),
            explicit: "explicit.csv".to_string(),
            non_explicit: "non_explicit.csv".to_string(),
            popularity_correlation: "popularity_correlation.csv".to_string(),
            artist_stats: "artist_stats.csv".to_string(),
        }
    }
}

/// `[genres]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenreConfig {
    /// Replaces the built-in allow-list when set
    pub allowed: Option<Vec<String>>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub data_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sample_size: Option<usize>,
    pub comparison_sample_size: Option<usize>,
    pub normalize_genres: Option<bool>,
    pub comparisons: Option<bool>,
    pub sample_seed: Option<u64>,
    pub log_level: Option<String>,
    pub files: FileNames,
    pub genres: GenreConfig,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sample_size: Option<usize>,
    pub comparison_sample_size: Option<usize>,
    pub normalize_genres: Option<bool>,
    pub comparisons: Option<bool>,
    pub sample_seed: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Upper bound on songs drawn for the scatter plot
    pub sample_size: usize,
    /// Songs drawn per group for the explicit/non-explicit comparison
    pub comparison_sample_size: usize,
    pub normalize_genres: bool,
    /// Load and serve the comparison charts; their four files are then required
    pub comparisons: bool,
    /// Fixed RNG seed; entropy-seeded when absent
    pub sample_seed: Option<u64>,
    pub log_level: String,
    pub files: FileNames,
    pub allowed_genres: Option<Vec<String>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            comparison_sample_size: DEFAULT_COMPARISON_SAMPLE_SIZE,
            normalize_genres: false,
            comparisons: true,
            sample_seed: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            files: FileNames::default(),
            allowed_genres: None,
        }
    }
}

impl DashboardConfig {
    /// Merge overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: Overrides, file: TomlConfig) -> Result<Self> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            data_dir: overrides
                .data_dir
                .or(file.data_dir)
                .unwrap_or(defaults.data_dir),
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            sample_size: overrides
                .sample_size
                .or(file.sample_size)
                .unwrap_or(defaults.sample_size),
            comparison_sample_size: overrides
                .comparison_sample_size
                .or(file.comparison_sample_size)
                .unwrap_or(defaults.comparison_sample_size),
            normalize_genres: overrides
                .normalize_genres
                .or(file.normalize_genres)
                .unwrap_or(defaults.normalize_genres),
            comparisons: overrides
                .comparisons
                .or(file.comparisons)
                .unwrap_or(defaults.comparisons),
            sample_seed: overrides.sample_seed.or(file.sample_seed),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            files: file.files,
            allowed_genres: file.genres.allowed,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::Config("sample_size must be greater than 0".to_string()));
        }
        if self.comparisons && self.comparison_sample_size == 0 {
            return Err(Error::Config(
                "comparison_sample_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of a data file
    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// `host:port` to bind the HTTP server to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default config file location (`~/.config/songscope/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songscope").join("config.toml"))
}

/// Parse TOML config text
pub fn parse_toml_config(text: &str) -> Result<TomlConfig> {
    toml::from_str(text).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
}

/// Load the TOML config
///
/// An explicitly given path must exist. Without one, the default location is
/// tried and silently skipped when absent.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    info!("Loading config from {}", path.display());
    let text = std::fs::read_to_string(&path)?;
    parse_toml_config(&text)
}
