//! Module records harvested from source repositories
//!
//! A module is either a reusable library or an application template.
//! Modules reference each other by name only; the cache owns the records
//! and every graph algorithm works over a slice of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// `TEMPLATE` value of an application template
pub const KIND_APP: &str = "app";
/// `TEMPLATE` value of a plain library
pub const KIND_LIB: &str = "lib";
/// `TEMPLATE` value of a library that aggregates sub-projects
pub const KIND_SUBDIRS: &str = "subdirs";

/// Return the leading `_`-delimited component of a module name
pub fn extract_prefix(name: &str) -> &str {
    name.split('_').next().unwrap_or_default()
}

/// Return everything after the first `_` of a module name (empty if there is none)
pub fn extract_suffix(name: &str) -> &str {
    name.split_once('_').map(|(_, rest)| rest).unwrap_or_default()
}

/// A library or application template
///
/// `Module::default()` is the "empty module" returned by lookups that miss;
/// check it with [`Module::is_empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    /// Unique name, conventionally `<prefix>_<suffix>`
    pub name: String,

    /// Checked-out location (informational)
    pub path: String,

    /// `TEMPLATE` value from `vars.pri`: app, lib, subdirs, ...
    #[serde(rename = "type")]
    pub kind: String,

    /// Full remote URL of the module's repository
    #[serde(rename = "gitRepoURL")]
    pub git_repo_url: String,

    /// Remote URL with the module's own name stripped
    #[serde(rename = "gitRepoPrefix")]
    pub git_repo_prefix: String,

    /// Names of the modules this one requires
    pub dependencies: BTreeSet<String>,
}

impl Module {
    /// Create a module with just a name and kind
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper to attach dependencies
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// True for the sentinel returned by a failed lookup
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Product-family part of the name
    pub fn prefix(&self) -> &str {
        extract_prefix(&self.name)
    }

    /// Distinguishing part of the name
    pub fn suffix(&self) -> &str {
        extract_suffix(&self.name)
    }

    /// Application template that can be cloned into a new project
    pub fn is_app(&self) -> bool {
        self.kind == KIND_APP
    }

    /// Library that can be selected as a dependency
    pub fn is_library(&self) -> bool {
        self.kind == KIND_LIB || self.kind == KIND_SUBDIRS
    }

    /// Serialize into the index document record
    pub fn save_state(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "path": self.path,
            "type": self.kind,
            "gitRepoURL": self.git_repo_url,
            "gitRepoPrefix": self.git_repo_prefix,
            "dependencies": self.dependencies,
        })
    }

    /// Load from an index document record.
    ///
    /// Missing or mistyped fields become empty; non-string dependency
    /// entries are skipped.
    pub fn load_state(&mut self, j: &Value) {
        let string = |key: &str| {
            j.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        self.name = string("name");
        self.path = string("path");
        self.kind = string("type");
        self.git_repo_url = string("gitRepoURL");
        self.git_repo_prefix = string("gitRepoPrefix");

        self.dependencies = j
            .get("dependencies")
            .and_then(Value::as_array)
            .map(|deps| {
                deps.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
    }
}
