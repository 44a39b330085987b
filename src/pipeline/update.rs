//! Cache update: clone every source repo and harvest module records

use super::{fs_failure, run_checked};
use crate::cache::{sort_modules, Cache, Module};
use crate::config::CommandsConfig;
use crate::error::ForgeResult;
use crate::manifest;
use crate::process::{shell_quote, CommandRunner};
use crate::progress::Progress;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Working clones live here, below the cache directory
pub const REPOS_DIR: &str = "repos";

/// Location of the working clones for `cache`
pub fn repos_directory(cache: &Cache) -> PathBuf {
    cache.cache_directory().join(REPOS_DIR)
}

/// Rebuild the module list from the cache's source repos.
///
/// The new list is committed with a single `set_modules` at the very end,
/// so any failure leaves the persisted modules untouched. Returns the number
/// of modules found.
pub async fn update_cache(
    cache: &mut Cache,
    runner: &dyn CommandRunner,
    commands: &CommandsConfig,
    progress: &mut Progress<'_>,
) -> ForgeResult<usize> {
    let repos = repos_directory(cache);

    {
        let mut p = progress.child("Deleting existing repos", 0.1);
        clean(&repos, &p).await?;
        p.add_message("Done");
        p.set_progress(1.0);
    }

    {
        let mut p = progress.child("Cloning template modules", 0.3);
        p.add_message(format!("Cloning repos into: {}", repos.display()));

        let source_repos = cache.source_repos().to_vec();
        let step = 1.0 / source_repos.len().max(1) as f32;
        let mut f = 0.0;
        for url in &source_repos {
            p.add_message(format!("Cloning: {}", url));
            let command = format!("{} {}", commands.clone, shell_quote(url));
            run_checked(runner, &repos, &command, &p, &format!("Failed to clone: {}", url)).await?;

            f += step;
            p.set_progress(f);
        }
    }

    {
        let mut p = progress.child("Fetching submodules", 0.9);
        run_checked(
            runner,
            &repos,
            &commands.fetch_submodules,
            &p,
            &format!("Failed to run {}", commands.fetch_submodules),
        )
        .await?;
        p.add_message("Done");
        p.set_progress(1.0);
    }

    let mut p = progress.child("Reading dependencies", 1.0);
    let directories = module_directories(&repos, &p).await?;

    let step = 1.0 / directories.len().max(1) as f32;
    let mut f = 0.0;
    let mut modules = Vec::with_capacity(directories.len());
    for (name, path) in directories {
        p.add_message(format!("Reading dependencies of: {}", name));
        modules.push(read_module(runner, commands, &name, &path).await);

        f += step;
        p.set_progress(f);
    }

    sort_modules(&mut modules);
    let count = modules.len();
    cache.set_modules(modules)?;

    info!("Cache updated with {} modules", count);
    Ok(count)
}

async fn clean(repos: &Path, p: &Progress<'_>) -> ForgeResult<()> {
    if fs::try_exists(repos).await.unwrap_or(false) {
        fs::remove_dir_all(repos).await.map_err(|e| {
            fs_failure(
                p,
                "Failed to delete existing repos",
                format!("removing {}", repos.display()),
                e,
            )
        })?;
    }

    fs::create_dir_all(repos).await.map_err(|e| {
        fs_failure(
            p,
            "Failed to create repos directory",
            format!("creating {}", repos.display()),
            e,
        )
    })
}

/// First-level subdirectories of `repos`, sorted by name
async fn module_directories(repos: &Path, p: &Progress<'_>) -> ForgeResult<Vec<(String, PathBuf)>> {
    let context = || format!("listing {}", repos.display());
    let mut entries = fs::read_dir(repos)
        .await
        .map_err(|e| fs_failure(p, "Failed to list cloned repos", context(), e))?;

    let mut directories = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| fs_failure(p, "Failed to list cloned repos", context(), e))?
    {
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            let name = entry.file_name().to_string_lossy().into_owned();
            directories.push((name, entry.path()));
        }
    }

    directories.sort();
    Ok(directories)
}

/// Build one module record from its checked-out directory
async fn read_module(
    runner: &dyn CommandRunner,
    commands: &CommandsConfig,
    name: &str,
    path: &Path,
) -> Module {
    let mut module = Module::new(name, String::new());
    module.path = path.display().to_string();

    match runner.capture(path, &commands.remote_url).await {
        Ok(out) if out.success() => {
            module.git_repo_url = out.stdout.chars().filter(|c| !c.is_whitespace()).collect();
        }
        Ok(out) => warn!("No remote URL for {} (exit code {})", name, out.code),
        Err(e) => warn!("No remote URL for {}: {}", name, e),
    }
    module.git_repo_prefix = repo_prefix(&module.git_repo_url, name);

    module.dependencies = manifest::read_dependencies(path);
    if let Some(kind) = manifest::read_template_kind(path) {
        module.kind = kind;
    }

    debug!(
        "Read module {} ({}, {} dependencies)",
        module.name,
        module.kind,
        module.dependencies.len()
    );
    module
}

/// Remote URL truncated at the last occurrence of the module's name
fn repo_prefix(url: &str, name: &str) -> String {
    match url.rfind(name) {
        Some(i) => url[..i].to_string(),
        None => url.to_string(),
    }
}
