//! Configuration schema for modforge
//!
//! Configuration is stored at `~/.config/modforge/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// External command lines used by the pipelines
    pub commands: CommandsConfig,

    /// Generation settings
    pub generate: GenerateConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Cache directory (defaults to the platform data dir)
    pub cache_dir: Option<PathBuf>,

    /// Root path new projects are generated under, remembered between runs
    pub root_path: Option<PathBuf>,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            root_path: None,
            audit_log: true,
        }
    }
}

impl GeneralConfig {
    /// Configured cache directory, or the platform default
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// Platform default cache directory
pub fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("modforge")
}

/// Command lines run through `sh -c`. Arguments are appended by the pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Clone a repository (`<clone> <url>` or `<clone> <url> .`)
    pub clone: String,

    /// Fetch nested dependencies of every cloned module without updating them
    pub fetch_submodules: String,

    /// Refresh build metadata of a generated project
    pub refresh: String,

    /// Print a module's remote URL
    pub remote_url: String,

    /// Initialise a fresh repository
    pub init: String,

    /// Register the origin remote (`<remote_add> <url>`)
    pub remote_add: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            clone: "git clone".to_string(),
            fetch_submodules: "tpUpdate noupdate".to_string(),
            refresh: "tpUpdate".to_string(),
            remote_url: "git config --get remote.origin.url".to_string(),
            init: "git init".to_string(),
            remote_add: "git remote add origin".to_string(),
        }
    }
}

/// File copied from the new module up into the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelFile {
    pub source: String,
    pub dest: String,
}

impl TopLevelFile {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Appended to the remote prefix and module name to form the new remote
    pub git_extension: String,

    /// Best-effort copies into the project root. `<suffix>.pro` is always added.
    pub top_level_files: Vec<TopLevelFile>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            git_extension: ".git".to_string(),
            top_level_files: vec![
                TopLevelFile::new("Makefile.top", "Makefile"),
                TopLevelFile::new("CMakeFiles.top", "CMakeFiles.txt"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[commands]"));
        assert!(toml.contains("tpUpdate noupdate"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.general.audit_log);
        assert_eq!(config.commands.clone, "git clone");
        assert_eq!(config.generate.top_level_files.len(), 2);
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [commands]
            refresh = "make qmake"

            [general]
            cache_dir = "/var/cache/forge"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.commands.refresh, "make qmake");
        assert_eq!(config.commands.init, "git init"); // default preserved
        assert_eq!(config.general.cache_dir(), PathBuf::from("/var/cache/forge"));
    }

    #[test]
    fn default_cache_dir_is_named() {
        assert!(GeneralConfig::default().cache_dir().ends_with("modforge"));
    }
}
