//! Sort-submodules command - reorder an existing submodules.pri

use super::Context;
use crate::cli::args::SortSubmodulesArgs;
use crate::error::ForgeResult;
use crate::manifest;
use crate::ui::{self, UiContext};

/// Execute the sort-submodules command
pub async fn execute(args: SortSubmodulesArgs, ctx: &Context) -> ForgeResult<()> {
    let ui_ctx = UiContext::detect();
    let cache = ctx.open_cache()?;

    let count = manifest::sort_submodules_file(&cache.graph(), &args.file)?;
    if count == 0 {
        ui::step_info(
            &ui_ctx,
            &format!("No SUBDIRS entries in {}, left unchanged", args.file.display()),
        );
    } else {
        ui::step_ok_detail(
            &ui_ctx,
            &format!("Sorted {} entries", count),
            &args.file.display().to_string(),
        );
    }

    Ok(())
}
