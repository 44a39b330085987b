//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// modforge - module cache and application scaffolding
///
/// Harvests library and template modules from git repositories into a local
/// cache, then generates new application modules from those templates.
#[derive(Parser, Debug)]
#[command(name = "modforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MODFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory (overrides general.cache_dir)
    #[arg(long, global = true, env = "MODFORGE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the source repositories the cache is built from
    Repos(ReposArgs),

    /// Clone every source repository and rebuild the module cache
    Update,

    /// Inspect cached modules
    Modules(ModulesArgs),

    /// Generate a new application module from a template
    Generate(GenerateArgs),

    /// Re-sort an existing submodules.pri by the cached module order
    SortSubmodules(SortSubmodulesArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Print shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the repos command
#[derive(Parser, Debug)]
pub struct ReposArgs {
    #[command(subcommand)]
    pub action: Option<ReposAction>,
}

#[derive(Subcommand, Debug)]
pub enum ReposAction {
    /// List source repositories
    List,

    /// Replace the whole list
    Set {
        /// Repository URLs, in clone order
        urls: Vec<String>,
    },

    /// Append a repository
    Add {
        url: String,
    },

    /// Remove a repository
    Remove {
        url: String,
    },
}

/// Arguments for the modules command
#[derive(Parser, Debug)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub action: Option<ModulesAction>,
}

#[derive(Subcommand, Debug)]
pub enum ModulesAction {
    /// List cached modules in cache order
    List {
        /// Only show one kind of module
        #[arg(short, long)]
        kind: Option<ModuleKind>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one module and everything it depends on
    Show {
        name: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Re-sort the cached module list and save it
    Sort,
}

/// Module kind filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModuleKind {
    /// Application templates
    App,
    /// Libraries (lib and subdirs)
    Lib,
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Template module to clone (prompted if omitted)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Root directory projects are generated under (defaults to general.root_path)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Module prefix, e.g. the product family
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Module suffix
    #[arg(short, long)]
    pub suffix: Option<String>,

    /// Extra libraries to depend on (repeatable or comma-separated)
    #[arg(short, long = "lib", value_delimiter = ',')]
    pub libs: Vec<String>,

    /// Print the plan and generated fragments without touching disk
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the sort-submodules command
#[derive(Parser, Debug)]
pub struct SortSubmodulesArgs {
    /// submodules.pri to rewrite
    pub file: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Dot-separated key, e.g. commands.refresh
        key: String,

        value: String,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON
    Json,
    /// One name per line
    Plain,
}
