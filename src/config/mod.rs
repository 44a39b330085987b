//! User configuration
//!
//! Read from `~/.config/modforge/config.toml` unless `--config` (or
//! `MODFORGE_CONFIG`) names another file. A missing file means defaults.

pub mod schema;

pub use schema::{CommandsConfig, Config, GenerateConfig, GeneralConfig, TopLevelFile};

use crate::error::{ForgeError, ForgeResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Loads and saves the config file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modforge")
            .join("config.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> ForgeResult<Config> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(ForgeError::io(
                    format!("reading config {}", self.path.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content).map_err(|e| ForgeError::ConfigInvalid {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `config` as pretty TOML, creating the parent directory
    pub async fn save(&self, config: &Config) -> ForgeResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| ForgeError::io(format!("creating {}", dir.display()), e))?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| ForgeError::io(format!("writing config {}", self.path.display()), e))?;

        info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
