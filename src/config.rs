//! User configuration: a YAML file plus environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::optimizer::ranking::DEFAULT_REPORT_COLUMNS;
use crate::optimizer::SearchStrategy;
use crate::parallel::WorkerPool;

pub const CONFIG_ENV: &str = "SOULBOX_CONFIG";
pub const DATA_DIR_ENV: &str = "SOULBOX_DATA_DIR";
const APP_DIR: &str = "soulbox";
const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_CONFIG_TEXT: &str = "\
# soulbox configuration
#
# Directory holding saved boxes (boxes/<name>.json).
# data_dir: ~/.local/share/soulbox
#
# JSON object mapping type sets (\"fire\", \"fire/water\") to scores.
# score_table: /path/to/scores.json
search:
  # exhaustive | backtracking | parallel
  strategy: backtracking
  # 0 uses every core
  workers: 0
report:
  # score column plus member names
  columns: 13
";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("cannot locate config or data directory: set SOULBOX_CONFIG, SOULBOX_DATA_DIR or HOME")]
    NoHome,
    #[error("report.columns must be at least 1")]
    ZeroColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    pub workers: WorkerPool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_REPORT_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub score_table: Option<PathBuf>,
    pub search: SearchConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.report.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        Ok(config)
    }

    /// Load from `path`; a missing file gets a commented default written in
    /// its place and the defaults are returned.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                write_default(path);
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load the file named by the environment and apply overrides.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        Self::load_from_env(true)
    }

    /// Like [Config::load] but a missing file is not created.
    pub fn peek() -> Result<(Self, PathBuf), ConfigError> {
        Self::load_from_env(false)
    }

    fn load_from_env(init: bool) -> Result<(Self, PathBuf), ConfigError> {
        let path = config_path().ok_or(ConfigError::NoHome)?;
        let mut config = if init || path.is_file() {
            Self::load_or_init(&path)?
        } else {
            Self::default()
        };
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        log::debug!("loaded config from {}", path.display());
        Ok((config, path))
    }

    pub fn resolved_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(expand_home(dir)),
            None => default_data_dir().ok_or(ConfigError::NoHome),
        }
    }

    /// The score table override with a leading `~` expanded.
    pub fn resolved_score_table(&self) -> Option<PathBuf> {
        self.score_table.as_deref().map(expand_home)
    }
}

fn write_default(path: &Path) {
    let result = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(path, DEFAULT_CONFIG_TEXT));
    match result {
        Ok(()) => log::info!("wrote default config to {}", path.display()),
        Err(err) => log::warn!("could not write default config {}: {err}", path.display()),
    }
}

fn env_dir(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> Option<PathBuf> {
    env_dir("HOME")
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// `$SOULBOX_CONFIG`, else the XDG config location.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env_dir(CONFIG_ENV) {
        return Some(path);
    }
    env_dir("XDG_CONFIG_HOME")
        .or_else(|| home_dir().map(|home| home.join(".config")))
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_data_dir() -> Option<PathBuf> {
    env_dir("XDG_DATA_HOME")
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .map(|dir| dir.join(APP_DIR))
}
