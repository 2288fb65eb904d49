//! Configuration management for the neighbors tool.
//!
//! Configuration is merged from three sources, later ones winning:
//! - Built-in defaults (`postlist.txt`, `faiss_bert.faiss`, top 30)
//! - A YAML config file (`<data-dir>/neighbors.yaml` or `--config`)
//! - Command-line flags and their environment variables
//!
//! Relative file paths are resolved against the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default id table file name.
pub const DEFAULT_ID_TABLE: &str = "postlist.txt";

/// Default serialized index file name.
pub const DEFAULT_INDEX: &str = "faiss_bert.faiss";

/// Default number of neighbors to return.
pub const DEFAULT_TOP_K: usize = 30;

/// Config file looked up in the data directory when none is given.
pub const CONFIG_FILE_NAME: &str = "neighbors.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base directory for relative paths and config discovery
    pub data_dir: PathBuf,

    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Id table path (relative to `data_dir` unless absolute)
    pub id_table: PathBuf,

    /// Serialized index path (relative to `data_dir` unless absolute)
    pub index: PathBuf,

    /// Number of neighbors to return
    pub top_k: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Values supplied on the command line (or their environment variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub id_table: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    files: Option<FilesConfig>,
    search: Option<SearchConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FilesConfig {
    id_table: Option<PathBuf>,
    index: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SearchConfig {
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            id_table: PathBuf::from(DEFAULT_ID_TABLE),
            index: PathBuf::from(DEFAULT_INDEX),
            top_k: DEFAULT_TOP_K,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults and an optional YAML file.
    ///
    /// When `config_file` is `None`, `<data_dir>/neighbors.yaml` is merged if it
    /// exists. An explicitly named config file must exist.
    ///
    /// # Example
    /// ```no_run
    /// use neighbors_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Index: {:?}", config.index_path());
    /// ```
    pub fn load(data_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = data_dir {
            config.data_dir = data_dir;
        }

        if !config.data_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Data directory does not exist: {:?}",
                config.data_dir
            )));
        }

        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {:?}",
                        path
                    )));
                }
                Some(path)
            }
            None => {
                let candidate = config.data_dir.join(CONFIG_FILE_NAME);
                candidate.exists().then_some(candidate)
            }
        };

        if let Some(path) = config_path {
            config = config.merge_yaml(&path)?;
            config.config_file = Some(path);
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        // An empty YAML document deserializes to unit, not a map.
        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
            })?
        };

        let mut result = self.clone();

        if let Some(files) = config_file.files {
            if let Some(id_table) = files.id_table {
                result.id_table = id_table;
            }
            if let Some(index) = files.index {
                result.index = index;
            }
        }

        if let Some(search) = config_file.search {
            if let Some(top_k) = search.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(id_table) = overrides.id_table {
            self.id_table = id_table;
        }

        if let Some(index) = overrides.index {
            self.index = index;
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolved path of the id table.
    pub fn id_table_path(&self) -> PathBuf {
        self.data_dir.join(&self.id_table)
    }

    /// Resolved path of the serialized index.
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index)
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Argument(
                "top-k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
