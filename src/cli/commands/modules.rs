//! Modules command - inspect and re-sort cached modules

use super::Context;
use crate::cache::{Cache, Module};
use crate::cli::args::{ModuleKind, ModulesAction, ModulesArgs, OutputFormat};
use crate::error::{ForgeError, ForgeResult};
use crate::ui::{self, UiContext};
use console::style;

/// Execute the modules command
pub async fn execute(args: ModulesArgs, ctx: &Context) -> ForgeResult<()> {
    let mut cache = ctx.open_cache()?;

    match args.action {
        None => list(&cache, None, OutputFormat::Table),
        Some(ModulesAction::List { kind, format }) => list(&cache, kind, format),
        Some(ModulesAction::Show { name, format }) => show(&cache, &name, format),
        Some(ModulesAction::Sort) => sort(&mut cache),
    }
}

fn matches_kind(module: &Module, kind: Option<ModuleKind>) -> bool {
    match kind {
        None => true,
        Some(ModuleKind::App) => module.is_app(),
        Some(ModuleKind::Lib) => module.is_library(),
    }
}

fn list(cache: &Cache, kind: Option<ModuleKind>, format: OutputFormat) -> ForgeResult<()> {
    let modules: Vec<&Module> = cache
        .modules()
        .iter()
        .filter(|m| matches_kind(m, kind))
        .collect();

    if modules.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ui_ctx = UiContext::detect();
                ui::step_info(&ui_ctx, "No modules cached");
                ui::remark(&ui_ctx, "Run: modforge update");
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&modules),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&modules)?),
        OutputFormat::Plain => {
            for module in modules {
                println!("{}", module.name);
            }
        }
    }

    Ok(())
}

fn print_table(modules: &[&Module]) {
    println!(
        "{:<28} {:<9} {}",
        style("NAME").bold(),
        style("TYPE").bold(),
        style("DEPENDENCIES").bold()
    );
    println!("{}", "-".repeat(72));

    for module in modules {
        let kind = if module.is_app() {
            style(module.kind.as_str()).cyan()
        } else {
            style(module.kind.as_str()).dim()
        };
        let deps = module
            .dependencies
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<28} {:<9} {}", module.name, kind, deps);
    }

    println!();
    println!("{} module(s)", modules.len());
}

fn show(cache: &Cache, name: &str, format: OutputFormat) -> ForgeResult<()> {
    let module = cache
        .find(name)
        .ok_or_else(|| ForgeError::ModuleNotFound(name.to_string()))?;

    let mut closure = cache.graph().dependency_closure(&module.dependencies);
    closure.remove(&module.name);
    let requires = cache.sort_dependencies(&closure);

    match format {
        OutputFormat::Json => {
            let mut value = module.save_state();
            value["requires"] = serde_json::json!(requires);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Plain => {
            for dep in requires {
                println!("{}", dep);
            }
        }
        OutputFormat::Table => {
            let ui_ctx = UiContext::detect();
            ui::section(&ui_ctx, &module.name);
            ui::key_value(&ui_ctx, "Type", &module.kind);
            ui::key_value(&ui_ctx, "Path", &module.path);
            ui::key_value(&ui_ctx, "Remote", &module.git_repo_url);
            ui::key_value(&ui_ctx, "Remote prefix", &module.git_repo_prefix);
            ui::key_value(
                &ui_ctx,
                "Dependencies",
                &module.dependencies.iter().cloned().collect::<Vec<_>>().join(", "),
            );
            ui::key_value(&ui_ctx, "Requires", &requires.join(", "));
        }
    }

    Ok(())
}

fn sort(cache: &mut Cache) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let moved = cache.sort_modules()?;

    ui::step_ok(
        &ui_ctx,
        &format!("Sorted {} modules ({} moved)", cache.modules().len(), moved),
    );
    Ok(())
}
