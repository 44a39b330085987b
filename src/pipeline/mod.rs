//! Long-running pipelines
//!
//! Both pipelines run their steps strictly in order and stop at the first
//! hard failure. Nothing is rolled back: files written by earlier steps stay
//! on disk and the progress log explains what happened.

pub mod generate;
pub mod update;

pub use generate::{generate, plan, GeneratePlan, GenerateRequest, GenerateStep};
pub use update::{repos_directory, update_cache, REPOS_DIR};

use crate::error::{ForgeError, ForgeResult};
use crate::process::CommandRunner;
use crate::progress::Progress;
use std::path::Path;

/// Run an external command that must succeed.
///
/// On failure `failure` and the exit code go to the progress error channel.
pub(crate) async fn run_checked(
    runner: &dyn CommandRunner,
    dir: &Path,
    command: &str,
    progress: &Progress<'_>,
    failure: &str,
) -> ForgeResult<()> {
    let code = match runner.run(dir, command).await {
        Ok(code) => code,
        Err(e) => {
            progress.add_error(failure);
            progress.add_error(e.to_string());
            return Err(e);
        }
    };

    if code != 0 {
        progress.add_error(failure);
        progress.add_error(format!("Return code: {}", code));
        return Err(ForgeError::command_exit(command, code));
    }

    Ok(())
}

/// Report a filesystem failure and turn it into an error
pub(crate) fn fs_failure(
    progress: &Progress<'_>,
    message: &str,
    context: String,
    source: std::io::Error,
) -> ForgeError {
    progress.add_error(message);
    progress.add_error(source.to_string());
    ForgeError::io(context, source)
}
