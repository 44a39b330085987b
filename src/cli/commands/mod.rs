//! CLI command implementations

pub mod completions;
pub mod config;
pub mod generate;
pub mod modules;
pub mod repos;
pub mod sort_submodules;
pub mod update;

pub use completions::execute as completions;
pub use config::execute as config;
pub use generate::execute as generate;
pub use modules::execute as modules;
pub use repos::execute as repos;
pub use sort_submodules::execute as sort_submodules;
pub use update::execute as update;

use crate::audit::AuditLog;
use crate::cache::Cache;
use crate::config::{Config, ConfigManager};
use crate::error::ForgeResult;
use std::path::PathBuf;

/// Everything a command needs from the global flags
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub config_manager: ConfigManager,
    pub cache_dir: PathBuf,
}

impl Context {
    /// Resolve the cache directory: `--cache-dir` wins over the config file
    pub fn new(config: Config, config_manager: ConfigManager, cache_dir: Option<PathBuf>) -> Self {
        let cache_dir = cache_dir.unwrap_or_else(|| config.general.cache_dir());
        Self {
            config,
            config_manager,
            cache_dir,
        }
    }

    pub fn open_cache(&self) -> ForgeResult<Cache> {
        Cache::open(&self.cache_dir)
    }

    pub fn audit(&self) -> AuditLog {
        AuditLog::new(&self.config, &self.cache_dir)
    }
}
