//! Configuration file support for liftmap.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftmap/config.toml`.

use crate::parser::ParserDefaults;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the exercise catalog inside the data directory
pub const CATALOG_FILE_NAME: &str = "exercise_map.json";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub parser: ParserConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
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

/// Exercise catalog location
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Explicit catalog file; falls back to `<data_dir>/exercise_map.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Defaults applied when a line doesn't spell out sets or reps
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_sets")]
    pub default_sets: u32,

    #[serde(default = "default_reps")]
    pub default_reps: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_sets: default_sets(),
            default_reps: default_reps(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("liftmap")
}

fn default_sets() -> u32 {
    3
}

fn default_reps() -> u32 {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("liftmap").join("config.toml")
    }

    /// Reject values the parser cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.parser.default_sets == 0 {
            return Err(Error::Config("parser.default_sets must be at least 1".into()));
        }
        if self.parser.default_reps == 0 {
            return Err(Error::Config("parser.default_reps must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolved path of the exercise catalog
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .path
            .clone()
            .unwrap_or_else(|| self.data.data_dir.join(CATALOG_FILE_NAME))
    }

    /// Parser defaults derived from the `[parser]` table
    pub fn parser_defaults(&self) -> ParserDefaults {
        ParserDefaults {
            sets: self.parser.default_sets,
            reps: self.parser.default_reps,
        }
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
