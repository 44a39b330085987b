//! External command execution
//!
//! Pipelines never spawn processes directly. They go through a
//! [`CommandRunner`], so tests can script exit codes without git installed.

use crate::error::{ForgeError, ForgeResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Exit code and standard output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs shell command lines in a working directory
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `dir` and return its exit code.
    ///
    /// `Err` means the command could not be started at all.
    async fn run(&self, dir: &Path, command: &str) -> ForgeResult<i32>;

    /// Run `command` in `dir` and capture its standard output
    async fn capture(&self, dir: &Path, command: &str) -> ForgeResult<CommandOutput>;
}

/// Runner backed by `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    async fn exec(&self, dir: &Path, command: &str) -> ForgeResult<std::process::Output> {
        debug!("Executing in {}: {}", dir.display(), command);

        Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ForgeError::command_failed(command, e))
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, dir: &Path, command: &str) -> ForgeResult<i32> {
        let output = self.exec(dir, command).await?;
        let code = output.status.code().unwrap_or(-1);

        if code != 0 {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Exit code {} from '{}': {}", code, command, stderr.trim());
        }

        Ok(code)
    }

    async fn capture(&self, dir: &Path, command: &str) -> ForgeResult<CommandOutput> {
        let output = self.exec(dir, command).await?;
        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Quote a single shell word
pub fn shell_quote(word: &str) -> String {
    if !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@+=,%".contains(c))
    {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("git@example.com:fw/fw_core.git"), "git@example.com:fw/fw_core.git");
        assert_eq!(shell_quote("/tmp/my dir"), "'/tmp/my dir'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn shell_runner_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let runner = ShellRunner::new();
        assert_eq!(runner.run(temp.path(), "true").await.unwrap(), 0);
        assert_eq!(runner.run(temp.path(), "exit 3").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn shell_runner_uses_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "x").unwrap();

        let out = ShellRunner::new().capture(temp.path(), "ls").await.unwrap();
        assert!(out.success());
        assert!(out.stdout.contains("marker.txt"));
    }

    #[tokio::test]
    async fn fake_runner_first_rule_wins() {
        let runner = fake::FakeRunner::new()
            .exit("git clone bad", 128)
            .stdout("git config", "  url\n");
        let dir = Path::new("/nowhere");

        assert_eq!(runner.run(dir, "git clone bad.git").await.unwrap(), 128);
        assert_eq!(runner.run(dir, "git clone good.git").await.unwrap(), 0);
        assert_eq!(runner.capture(dir, "git config --get x").await.unwrap().stdout, "  url\n");
        assert_eq!(runner.commands().len(), 3);
    }
}
