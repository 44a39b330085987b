//! Update command - rebuild the module cache from the source repositories

use super::Context;
use crate::error::{ForgeError, ForgeResult};
use crate::pipeline::update_cache;
use crate::process::ShellRunner;
use crate::progress::Progress;
use crate::ui::{self, PipelineProgress, UiContext};
use serde_json::json;
use tracing::debug;

/// Execute the update command
pub async fn execute(ctx: &Context) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let mut cache = ctx.open_cache()?;

    if cache.source_repos().is_empty() {
        return Err(ForgeError::NoSourceRepos);
    }
    let repo_count = cache.source_repos().len();

    cache.subscribe(|c| debug!("Cache index saved with {} modules", c.modules().len()));

    ui::intro(&ui_ctx, "Updating module cache");
    let sink = PipelineProgress::new(&ui_ctx, "Updating");
    let result = update_cache(
        &mut cache,
        &ShellRunner::new(),
        &ctx.config.commands,
        &mut Progress::new(&sink),
    )
    .await;
    sink.finish();

    let audit = ctx.audit();
    match result {
        Ok(count) => {
            audit
                .log(
                    "cache.updated",
                    &json!({ "repos": repo_count, "modules": count }),
                )
                .await;
            ui::outro_success(
                &ui_ctx,
                &format!("Cache updated: {} modules from {} repositories", count, repo_count),
            );
            Ok(())
        }
        Err(e) => {
            audit
                .log(
                    "cache.update_failed",
                    &json!({ "repos": repo_count, "error": e.to_string() }),
                )
                .await;
            ui::outro_error(&ui_ctx, "Cache update failed, previous modules kept");
            Err(e)
        }
    }
}
