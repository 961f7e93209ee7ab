//! Configuration file support for the trip planner.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/trip-planner/config.toml`.

use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "trip-planner";

/// Application configuration
#[derive(Clone, Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Export output configuration
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ExportConfig {
    /// Defaults to `<data_dir>/exports` when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(base) => base.join(APP_DIR),
        None => PathBuf::from("data"),
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::debug!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join(APP_DIR).join("config.toml"))
    }

    /// Directory export files are written to
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .export_dir
            .clone()
            .unwrap_or_else(|| self.data.data_dir.join("exports"))
    }
}

/// Locations of the collection files inside a data directory
#[derive(Clone, Debug)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn itineraries(&self) -> PathBuf {
        self.root.join("itineraries.json")
    }

    pub fn packing_items(&self) -> PathBuf {
        self.root.join("packing_items.json")
    }

    pub fn expenses(&self) -> PathBuf {
        self.root.join("expenses.json")
    }
}
