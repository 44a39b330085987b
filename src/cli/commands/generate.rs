//! Generate command - scaffold a new application module

use super::Context;
use crate::cache::Cache;
use crate::cli::args::GenerateArgs;
use crate::error::{ForgeError, ForgeResult};
use crate::pipeline::{self, GeneratePlan, GenerateRequest};
use crate::process::ShellRunner;
use crate::progress::Progress;
use crate::ui::{self, PipelineProgress, UiContext};
use serde_json::json;
use std::path::Path;

/// Execute the generate command
pub async fn execute(args: GenerateArgs, ctx: &Context) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect().with_auto_yes(args.yes);
    let cache = ctx.open_cache()?;

    ui::intro(&ui_ctx, "Generate module");

    let template = match args.template {
        Some(template) => template,
        None => choose_template(&ui_ctx, &cache).await?,
    };
    let prefix = match args.prefix {
        Some(prefix) => prefix,
        None => ui::input(&ui_ctx, "Module prefix", "--prefix").await?,
    };
    let suffix = match args.suffix {
        Some(suffix) => suffix,
        None => ui::input(&ui_ctx, "Module suffix", "--suffix").await?,
    };
    let root_given = args.root.is_some();
    let root = match args.root.or_else(|| ctx.config.general.root_path.clone()) {
        Some(root) => root,
        None => std::env::current_dir()
            .map_err(|e| ForgeError::io("getting current directory", e))?,
    };
    let libs = if args.libs.is_empty() {
        choose_libraries(&ui_ctx, &cache, &template).await?
    } else {
        args.libs
    };

    let request = GenerateRequest::from_selection(&cache, &template, root, &prefix, &suffix, libs);
    let plan = pipeline::plan(&cache, &request, &ctx.config)?;
    show_plan(&ui_ctx, &request, &plan);

    if args.dry_run {
        ui::note(&ui_ctx, "submodules.pri", plan.submodules.trim_end());
        ui::note(&ui_ctx, "dependencies.pri", plan.dependencies.trim_end());
        ui::outro_success(&ui_ctx, "Dry run, nothing written");
        return Ok(());
    }

    if !ui::confirm(&ui_ctx, &format!("Generate {}?", plan.module_name), true).await? {
        ui::outro_error(&ui_ctx, "Cancelled");
        return Ok(());
    }

    let sink = PipelineProgress::new(&ui_ctx, "Generating");
    let result = pipeline::generate(
        &cache,
        &ShellRunner::new(),
        &ctx.config,
        &request,
        &mut Progress::new(&sink),
    )
    .await;
    sink.finish();

    let audit = ctx.audit();
    match result {
        Ok(plan) => {
            audit
                .log(
                    "module.generated",
                    &json!({
                        "module": plan.module_name,
                        "template": request.template,
                        "path": plan.app_path,
                        "remote": plan.git_repo,
                    }),
                )
                .await;
            if root_given {
                remember_root(ctx, &request.root_path).await?;
            }
            ui::outro_success(
                &ui_ctx,
                &format!("Generated {} at {}", plan.module_name, plan.app_path.display()),
            );
            Ok(())
        }
        Err(e) => {
            audit
                .log(
                    "module.generate_failed",
                    &json!({
                        "module": request.module_name(),
                        "template": request.template,
                        "error": e.to_string(),
                    }),
                )
                .await;
            ui::outro_error(&ui_ctx, "Generation failed, partial output left in place");
            Err(e)
        }
    }
}

async fn choose_template(ui_ctx: &UiContext, cache: &Cache) -> ForgeResult<String> {
    let templates: Vec<(String, &str, &str)> = cache
        .templates()
        .map(|m| (m.name.clone(), m.name.as_str(), m.git_repo_url.as_str()))
        .collect();

    if templates.is_empty() {
        return Err(ForgeError::TemplateNotFound("(no templates cached)".to_string()));
    }
    if !ui_ctx.is_interactive() {
        return Err(ForgeError::User(
            "Template is required in non-interactive mode (pass --template)".to_string(),
        ));
    }

    ui::select(ui_ctx, "Template", &templates).await
}

/// Offer every cached library; the template's own dependencies start selected
async fn choose_libraries(
    ui_ctx: &UiContext,
    cache: &Cache,
    template: &str,
) -> ForgeResult<Vec<String>> {
    let required = cache.module(template).dependencies;
    let options: Vec<(String, &str, &str)> = cache
        .libraries()
        .map(|m| {
            let hint = if required.contains(&m.name) { "required" } else { "" };
            (m.name.clone(), m.name.as_str(), hint)
        })
        .collect();

    ui::multiselect(ui_ctx, "Libraries", &options, required.into_iter().collect()).await
}

fn show_plan(ui_ctx: &UiContext, request: &GenerateRequest, plan: &GeneratePlan) {
    ui::key_value(ui_ctx, "Template", &plan.template().name);
    ui::key_value(ui_ctx, "Module", &plan.module_name);
    ui::key_value(ui_ctx, "Project", &plan.top_level_path.display().to_string());
    ui::key_value(ui_ctx, "Path", &plan.app_path.display().to_string());
    ui::key_value(ui_ctx, "Remote", &plan.git_repo);
    ui::key_value(
        ui_ctx,
        "Libraries",
        &request
            .selected_libraries
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
    );
    ui::key_value(
        ui_ctx,
        "Submodules",
        &request.all_dependencies.len().to_string(),
    );
}

/// Store an explicit `--root` as the default for later runs
async fn remember_root(ctx: &Context, root: &Path) -> ForgeResult<()> {
    if ctx.config.general.root_path.as_deref() == Some(root) {
        return Ok(());
    }
    let mut config = ctx.config.clone();
    config.general.root_path = Some(root.to_path_buf());
    ctx.config_manager.save(&config).await
}
