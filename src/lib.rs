//! modforge - module cache and application scaffolding
//!
//! Harvests library and template modules from git repositories into a
//! local cache, then generates new application modules from a template.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod ui;

pub use error::{ForgeError, ForgeResult};
