//! Module cache
//!
//! Holds the module graph harvested from the source repositories.
//!
//! # Layout
//!
//! | File | Contents |
//! |------|----------|
//! | `<cache_dir>/index.json` | source repo URLs and module records |
//! | `<cache_dir>/repos/` | working clones from the last update |
//! | `<cache_dir>/audit.log` | pipeline outcomes, one JSON object per line |

pub mod graph;
pub mod module;
pub mod store;

pub use graph::{sort_modules, DependencyGraph};
pub use module::{extract_prefix, extract_suffix, Module, KIND_APP, KIND_LIB, KIND_SUBDIRS};
pub use store::{Cache, SubscriptionId, INDEX_FILE};
