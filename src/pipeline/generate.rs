//! Scaffold a new application module from a cached template
//!
//! The new module lands at `<root>/<prefix>/<suffix>/<prefix>_<suffix>`.
//! `<root>/<prefix>/<suffix>` is the top-level project that pulls in the
//! module and its dependencies through `submodules.pri`.

use super::{fs_failure, run_checked};
use crate::cache::{extract_suffix, Cache, Module};
use crate::config::{Config, TopLevelFile};
use crate::error::{ForgeError, ForgeResult};
use crate::manifest::{self, DEPENDENCIES_FILE, SUBMODULES_FILE};
use crate::process::{shell_quote, CommandRunner};
use crate::progress::Progress;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Extension for the backups `sed -i` leaves behind
const SED_BACKUP_EXT: &str = ".forge-bak";

/// Parameters of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    /// Name of the application template to clone
    pub template: String,
    pub root_path: PathBuf,
    pub module_prefix: String,
    pub module_suffix: String,
    /// Libraries listed in the new `dependencies.pri`
    pub selected_libraries: BTreeSet<String>,
    /// Everything listed in the new `submodules.pri`
    pub all_dependencies: BTreeSet<String>,
}

impl GenerateRequest {
    /// Build a request the way a user picks it: the template's own
    /// dependencies are always selected, user libraries are added on top, and
    /// the submodule list is the transitive closure of that selection.
    pub fn from_selection<I, S>(
        cache: &Cache,
        template: &str,
        root_path: impl Into<PathBuf>,
        module_prefix: &str,
        module_suffix: &str,
        libraries: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected_libraries = cache.module(template).dependencies;
        selected_libraries.extend(libraries.into_iter().map(Into::into));

        let all_dependencies = cache.graph().dependency_closure(&selected_libraries);

        Self {
            template: template.to_string(),
            root_path: root_path.into(),
            module_prefix: module_prefix.to_string(),
            module_suffix: module_suffix.to_string(),
            selected_libraries,
            all_dependencies,
        }
    }

    /// `<prefix>_<suffix>`
    pub fn module_name(&self) -> String {
        format!("{}_{}", self.module_prefix, self.module_suffix)
    }

    /// `<root>/<prefix>/<suffix>`
    pub fn top_level_path(&self) -> PathBuf {
        self.root_path
            .join(&self.module_prefix)
            .join(&self.module_suffix)
    }

    /// `<root>/<prefix>/<suffix>/<prefix>_<suffix>`
    pub fn app_path(&self) -> PathBuf {
        self.top_level_path().join(self.module_name())
    }

    /// Reject names that would not survive the rename and substitution commands
    pub fn validate(&self) -> ForgeResult<()> {
        let invalid = |name: &str, reason: &str| ForgeError::InvalidModuleName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if self.module_prefix.is_empty()
            || !self.module_prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid(&self.module_prefix, "prefix must be [A-Za-z0-9]+"));
        }
        if self.module_suffix.is_empty()
            || !self
                .module_suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid(&self.module_suffix, "suffix must be [A-Za-z0-9_]+"));
        }
        Ok(())
    }
}

/// Everything derived from a request before touching the disk
#[derive(Debug, Clone, Serialize)]
pub struct GeneratePlan {
    pub module_name: String,
    pub top_level_path: PathBuf,
    pub app_path: PathBuf,
    /// Remote the template is cloned from
    pub template_url: String,
    /// Origin of the new repository
    pub git_repo: String,
    /// `(from, to)` token pairs for renaming and text substitution
    pub substitutions: Vec<(String, String)>,
    pub submodules: String,
    pub dependencies: String,
    pub top_level_files: Vec<TopLevelFile>,
    #[serde(skip)]
    template: Module,
}

impl GeneratePlan {
    pub fn template(&self) -> &Module {
        &self.template
    }
}

/// Validate a request against the cache and derive every path and fragment
pub fn plan(cache: &Cache, request: &GenerateRequest, config: &Config) -> ForgeResult<GeneratePlan> {
    request.validate()?;

    let template = cache.module(&request.template);
    if template.is_empty() {
        return Err(ForgeError::TemplateNotFound(request.template.clone()));
    }
    if !is_safe_token(&template.name) {
        return Err(ForgeError::InvalidModuleName {
            name: template.name.clone(),
            reason: "template name contains characters unsafe for renaming".to_string(),
        });
    }

    let module_name = request.module_name();
    let extension = &config.generate.git_extension;
    let git_repo = format!("{}{}{}", template.git_repo_prefix, module_name, extension);
    let template_url = if template.git_repo_url.is_empty() {
        format!("{}{}{}", template.git_repo_prefix, template.name, extension)
    } else {
        template.git_repo_url.clone()
    };

    let mut substitutions = Vec::new();
    for (from, to) in [
        (template.name.as_str(), module_name.as_str()),
        (extract_suffix(&template.name), request.module_suffix.as_str()),
    ] {
        if !from.is_empty() && from != to {
            substitutions.push((from.to_string(), to.to_string()));
        }
    }

    let graph = cache.graph();
    let submodules =
        manifest::generate_submodules(&graph, &module_name, &request.all_dependencies);
    let dependencies =
        manifest::generate_dependencies(&graph, &module_name, &request.selected_libraries);

    let mut top_level_files = config.generate.top_level_files.clone();
    let project_file = format!("{}.pro", request.module_suffix);
    top_level_files.push(TopLevelFile::new(project_file.clone(), project_file));

    Ok(GeneratePlan {
        top_level_path: request.top_level_path(),
        app_path: request.app_path(),
        module_name,
        template_url,
        git_repo,
        substitutions,
        submodules,
        dependencies,
        top_level_files,
        template,
    })
}

/// Generation steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateStep {
    CreateDirectory,
    CloneTemplate,
    RemoveGitMetadata,
    RenameFiles,
    ReplaceNames,
    WriteSubmodules,
    WriteDependencies,
    InitRepository,
    AddRemote,
    CopyTopLevelFiles,
    Refresh,
}

impl GenerateStep {
    pub const ALL: [GenerateStep; 11] = [
        Self::CreateDirectory,
        Self::CloneTemplate,
        Self::RemoveGitMetadata,
        Self::RenameFiles,
        Self::ReplaceNames,
        Self::WriteSubmodules,
        Self::WriteDependencies,
        Self::InitRepository,
        Self::AddRemote,
        Self::CopyTopLevelFiles,
        Self::Refresh,
    ];

    /// Overall completion once this step is done
    pub fn completion(self) -> f32 {
        match self {
            Self::CreateDirectory => 0.05,
            Self::CloneTemplate => 0.2,
            Self::RemoveGitMetadata => 0.25,
            Self::RenameFiles => 0.3,
            Self::ReplaceNames => 0.35,
            Self::WriteSubmodules => 0.4,
            Self::WriteDependencies => 0.45,
            Self::InitRepository => 0.5,
            Self::AddRemote => 0.55,
            Self::CopyTopLevelFiles => 0.6,
            Self::Refresh => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CreateDirectory => "Create module directory",
            Self::CloneTemplate => "Clone template",
            Self::RemoveGitMetadata => "Delete .git directory",
            Self::RenameFiles => "Rename files",
            Self::ReplaceNames => "Replace module names",
            Self::WriteSubmodules => "Generate submodules",
            Self::WriteDependencies => "Generate dependencies",
            Self::InitRepository => "Git init",
            Self::AddRemote => "Git remote add",
            Self::CopyTopLevelFiles => "Copy top level files",
            Self::Refresh => "Refresh build metadata",
        }
    }
}

/// Generate a new module. Stops at the first failing step; nothing written
/// by earlier steps is removed.
pub async fn generate(
    cache: &Cache,
    runner: &dyn CommandRunner,
    config: &Config,
    request: &GenerateRequest,
    progress: &mut Progress<'_>,
) -> ForgeResult<GeneratePlan> {
    let plan = match plan(cache, request, config) {
        Ok(plan) => plan,
        Err(e) => {
            progress.add_error(e.to_string());
            return Err(e);
        }
    };

    let generator = Generator {
        runner,
        config,
        plan: &plan,
    };
    for step in GenerateStep::ALL {
        generator.run(step, progress).await?;
        progress.set_progress(step.completion());
    }

    info!(
        "Generated {} from {} at {}",
        plan.module_name,
        plan.template.name,
        plan.app_path.display()
    );
    Ok(plan)
}

struct Generator<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a Config,
    plan: &'a GeneratePlan,
}

impl Generator<'_> {
    async fn run(&self, step: GenerateStep, progress: &Progress<'_>) -> ForgeResult<()> {
        let plan = self.plan;
        let commands = &self.config.commands;
        let app = &plan.app_path;

        match step {
            GenerateStep::CreateDirectory => {
                progress.add_message(format!("Create app module path: {}", app.display()));
                fs::create_dir_all(app).await.map_err(|e| {
                    fs_failure(
                        progress,
                        "Failed to create module directory",
                        format!("creating {}", app.display()),
                        e,
                    )
                })
            }

            GenerateStep::CloneTemplate => {
                let command = format!("{} {} .", commands.clone, shell_quote(&plan.template_url));
                progress.add_message(format!("Clone template: {}", command));
                run_checked(
                    self.runner,
                    app,
                    &command,
                    progress,
                    &format!("Failed to clone: {}", plan.template_url),
                )
                .await
            }

            GenerateStep::RemoveGitMetadata => {
                let git_dir = app.join(".git");
                progress.add_message(format!("Delete .git directory: {}", git_dir.display()));
                if !fs::try_exists(&git_dir).await.unwrap_or(false) {
                    return Ok(());
                }
                fs::remove_dir_all(&git_dir).await.map_err(|e| {
                    fs_failure(
                        progress,
                        "Failed to delete .git directory",
                        format!("removing {}", git_dir.display()),
                        e,
                    )
                })
            }

            GenerateStep::RenameFiles => {
                progress.add_message("Rename files.");
                for (from, to) in &plan.substitutions {
                    run_checked(
                        self.runner,
                        app,
                        &rename_command(from, to),
                        progress,
                        &format!("Failed to rename: {} to: {}", from, to),
                    )
                    .await?;
                }
                Ok(())
            }

            GenerateStep::ReplaceNames => {
                progress.add_message("Replace module names.");
                for (from, to) in &plan.substitutions {
                    run_checked(
                        self.runner,
                        app,
                        &replace_command(from, to),
                        progress,
                        &format!("Failed to replace: {} to: {}", from, to),
                    )
                    .await?;
                }
                Ok(())
            }

            GenerateStep::WriteSubmodules => {
                progress.add_message("Generate submodules.");
                self.write(SUBMODULES_FILE, &plan.submodules, progress).await
            }

            GenerateStep::WriteDependencies => {
                progress.add_message("Generate dependencies.");
                self.write(DEPENDENCIES_FILE, &plan.dependencies, progress)
                    .await
            }

            GenerateStep::InitRepository => {
                progress.add_message("Git init.");
                run_checked(self.runner, app, &commands.init, progress, "Failed to init.").await
            }

            GenerateStep::AddRemote => {
                progress.add_message("Git remote add.");
                let command = format!("{} {}", commands.remote_add, shell_quote(&plan.git_repo));
                run_checked(
                    self.runner,
                    app,
                    &command,
                    progress,
                    &format!("Failed to add git remote: {}", plan.git_repo),
                )
                .await
            }

            GenerateStep::CopyTopLevelFiles => {
                for file in &plan.top_level_files {
                    let from = app.join(&file.source);
                    let to = plan.top_level_path.join(&file.dest);
                    if let Err(e) = fs::copy(&from, &to).await {
                        warn!("Skipped copying {} to {}: {}", from.display(), to.display(), e);
                    }
                }
                Ok(())
            }

            GenerateStep::Refresh => {
                progress.add_message(format!("Run {}.", commands.refresh));
                run_checked(
                    self.runner,
                    &plan.top_level_path,
                    &commands.refresh,
                    progress,
                    &format!("Failed to run {}.", commands.refresh),
                )
                .await
            }
        }
    }

    async fn write(&self, file_name: &str, content: &str, progress: &Progress<'_>) -> ForgeResult<()> {
        let path = self.plan.app_path.join(file_name);
        fs::write(&path, content).await.map_err(|e| {
            fs_failure(
                progress,
                &format!("Failed to write {}", file_name),
                format!("writing {}", path.display()),
                e,
            )
        })
    }
}

/// Names usable inside the quoted rename and sed commands
fn is_safe_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Rename every file or directory whose own name starts with `from`.
///
/// `-depth` renames children before their parent directory and `-execdir`
/// hands over `./<name>`, so only the final path component changes.
pub fn rename_command(from: &str, to: &str) -> String {
    format!(
        "find . -depth -name '{from}*' -execdir sh -c 'mv \"$1\" \"{to}${{1#./{from}}}\"' _ {{}} \\;"
    )
}

/// Replace `from` with `to` in the contents of every file, then drop the
/// backups `sed -i` leaves behind
pub fn replace_command(from: &str, to: &str) -> String {
    let pattern = from.replace('.', "\\.");
    format!(
        "find . -type f -exec sed -i{ext} -e 's/{pattern}/{to}/g' {{}} + && \
         find . -type f -name '*{ext}' -exec rm -f {{}} +",
        ext = SED_BACKUP_EXT
    )
}
