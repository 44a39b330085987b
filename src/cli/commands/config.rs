//! Config command - show or edit configuration

use super::Context;
use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 10] = [
    "general.cache_dir",
    "general.root_path",
    "general.audit_log",
    "commands.clone",
    "commands.fetch_submodules",
    "commands.refresh",
    "commands.remote_url",
    "commands.init",
    "commands.remote_add",
    "generate.git_extension",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, ctx: &Context) -> ForgeResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(&ctx.config)?,
        Some(ConfigAction::Path) => println!("{}", ctx.config_manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(ctx, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(ctx, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> ForgeResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(ctx: &Context, force: bool) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let path = ctx.config_manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ui_ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    ctx.config_manager.save(&Config::default()).await?;

    ui::step_ok_detail(
        &ui_ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(ctx: &Context, key: &str, value: &str) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let mut config = ctx.config.clone();

    if let Err(e) = apply(&mut config, key, value) {
        if !VALID_KEYS.contains(&key) {
            ui::remark(&ui_ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
        }
        return Err(e);
    }

    ctx.config_manager.save(&config).await?;
    ui::step_ok(&ui_ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Set a dot-separated key on `config`
fn apply(config: &mut Config, key: &str, value: &str) -> ForgeResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let text = value.to_string();

    match parts.as_slice() {
        ["general", "cache_dir"] => config.general.cache_dir = optional_path(value),
        ["general", "root_path"] => config.general.root_path = optional_path(value),
        ["general", "audit_log"] => config.general.audit_log = parse_bool(value)?,

        ["commands", "clone"] => config.commands.clone = text,
        ["commands", "fetch_submodules"] => config.commands.fetch_submodules = text,
        ["commands", "refresh"] => config.commands.refresh = text,
        ["commands", "remote_url"] => config.commands.remote_url = text,
        ["commands", "init"] => config.commands.init = text,
        ["commands", "remote_add"] => config.commands.remote_add = text,

        ["generate", "git_extension"] => config.generate.git_extension = text,

        _ => return Err(ForgeError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

/// Empty string clears the setting
fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse_bool(value: &str) -> ForgeResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ForgeError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}
