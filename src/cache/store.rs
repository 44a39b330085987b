//! Persisted module cache
//!
//! One `Cache` per cache directory. The full state is written to
//! `index.json` after every mutation and subscribers are notified
//! synchronously before the setter returns.

use super::graph::{self, DependencyGraph};
use super::module::Module;
use crate::error::{ForgeError, ForgeResult};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the persisted cache document
pub const INDEX_FILE: &str = "index.json";

/// Handle returned by [`Cache::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeCallback = Box<dyn Fn(&Cache) + Send + Sync>;

/// Module cache backed by a directory on disk
pub struct Cache {
    cache_directory: PathBuf,
    source_repos: Vec<String>,
    modules: Vec<Module>,
    subscribers: Vec<(SubscriptionId, ChangeCallback)>,
    next_subscription: u64,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("cache_directory", &self.cache_directory)
            .field("source_repos", &self.source_repos)
            .field("modules", &self.modules.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Cache {
    /// Open the cache in `cache_directory`, creating the directory if absent.
    ///
    /// A missing index file yields an empty cache.
    pub fn open(cache_directory: impl Into<PathBuf>) -> ForgeResult<Self> {
        let cache_directory = cache_directory.into();
        fs::create_dir_all(&cache_directory).map_err(|e| {
            ForgeError::io(
                format!("creating cache directory {}", cache_directory.display()),
                e,
            )
        })?;

        let mut cache = Self {
            cache_directory,
            source_repos: Vec::new(),
            modules: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        cache.load()?;
        Ok(cache)
    }

    /// Directory this cache lives in
    pub fn cache_directory(&self) -> &Path {
        &self.cache_directory
    }

    /// Path of the persisted document
    pub fn index_path(&self) -> PathBuf {
        self.cache_directory.join(INDEX_FILE)
    }

    /// Repository URLs harvested by the next update
    pub fn source_repos(&self) -> &[String] {
        &self.source_repos
    }

    /// Replace the source repository list, save, and notify
    pub fn set_source_repos(&mut self, source_repos: Vec<String>) -> ForgeResult<()> {
        self.source_repos = source_repos;
        self.save()
    }

    /// Modules in canonical order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Replace the module list, save, and notify
    pub fn set_modules(&mut self, modules: Vec<Module>) -> ForgeResult<()> {
        self.modules = modules;
        self.save()
    }

    /// Look up a module by name, returning the empty module on a miss
    pub fn module(&self, name: &str) -> Module {
        self.find(name).cloned().unwrap_or_default()
    }

    /// Look up a module by name
    pub fn find(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Application templates in cache order
    pub fn templates(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.is_app())
    }

    /// Selectable libraries in cache order
    pub fn libraries(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| m.is_library())
    }

    /// Name index over the cached modules
    pub fn graph(&self) -> DependencyGraph<'_> {
        DependencyGraph::new(&self.modules)
    }

    /// True if `name` is reachable from `of`
    pub fn is_dependency(&self, name: &str, of: &str) -> bool {
        self.graph().is_dependency(name, of)
    }

    /// Re-sort the cached modules (see [`graph::sort_modules`]) and persist.
    ///
    /// Returns how many modules changed position.
    pub fn sort_modules(&mut self) -> ForgeResult<usize> {
        let mut modules = self.modules.clone();
        graph::sort_modules(&mut modules);

        let moved = modules
            .iter()
            .zip(&self.modules)
            .filter(|(a, b)| a.name != b.name)
            .count();
        self.set_modules(modules)?;
        Ok(moved)
    }

    /// Order a dependency set by the cache's module order, unknown names last
    pub fn sort_dependencies(&self, dependencies: &BTreeSet<String>) -> Vec<String> {
        self.graph().sort_dependencies(dependencies)
    }

    /// Register a callback invoked after every successful save
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Cache) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn save(&self) -> ForgeResult<()> {
        let modules: Vec<Value> = self.modules.iter().map(Module::save_state).collect();
        let document = json!({
            "sourceRepos": self.source_repos,
            "modules": modules,
        });

        let path = self.index_path();
        let content = serde_json::to_string_pretty(&document)?;
        fs::write(&path, content)
            .map_err(|e| ForgeError::io(format!("writing cache index {}", path.display()), e))?;

        debug!(
            "Saved cache index {} ({} repos, {} modules)",
            path.display(),
            self.source_repos.len(),
            self.modules.len()
        );

        // Callbacks only see `&Cache`, so they cannot mutate it re-entrantly.
        for (_, callback) in &self.subscribers {
            callback(self);
        }

        Ok(())
    }

    fn load(&mut self) -> ForgeResult<()> {
        let path = self.index_path();
        if !path.exists() {
            debug!("Cache index {} not found, starting empty", path.display());
            return Ok(());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| ForgeError::io(format!("reading cache index {}", path.display()), e))?;
        let document: Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                warn!(
                    "Cache index {} is unreadable ({}), starting empty",
                    path.display(),
                    e
                );
                return Ok(());
            }
        };

        self.source_repos = document
            .get("sourceRepos")
            .and_then(Value::as_array)
            .map(|repos| {
                repos
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        self.modules = document
            .get("modules")
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .map(|record| {
                        let mut module = Module::default();
                        module.load_state(record);
                        module
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(
            "Loaded cache index {} ({} repos, {} modules)",
            path.display(),
            self.source_repos.len(),
            self.modules.len()
        );
        Ok(())
    }
}
