//! Repos command - edit the source repository list

use super::Context;
use crate::cli::args::{ReposAction, ReposArgs};
use crate::error::{ForgeError, ForgeResult};
use crate::ui::{self, UiContext};

/// Execute the repos command
pub async fn execute(args: ReposArgs, ctx: &Context) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let mut cache = ctx.open_cache()?;

    match args.action {
        None | Some(ReposAction::List) => {
            if cache.source_repos().is_empty() {
                ui::step_info(&ui_ctx, "No source repositories");
            }
            for url in cache.source_repos() {
                println!("{}", url);
            }
        }
        Some(ReposAction::Set { urls }) => {
            let count = urls.len();
            cache.set_source_repos(urls)?;
            ui::step_ok(&ui_ctx, &format!("Set {} source repositories", count));
        }
        Some(ReposAction::Add { url }) => {
            let mut repos = cache.source_repos().to_vec();
            if repos.contains(&url) {
                ui::step_warn(&ui_ctx, &format!("Already listed: {}", url));
                return Ok(());
            }
            repos.push(url.clone());
            cache.set_source_repos(repos)?;
            ui::step_ok(&ui_ctx, &format!("Added {}", url));
        }
        Some(ReposAction::Remove { url }) => {
            let mut repos = cache.source_repos().to_vec();
            let before = repos.len();
            repos.retain(|r| r != &url);
            if repos.len() == before {
                return Err(ForgeError::User(format!("Not a source repository: {}", url)));
            }
            cache.set_source_repos(repos)?;
            ui::step_ok(&ui_ctx, &format!("Removed {}", url));
        }
    }

    Ok(())
}
