use async_trait::async_trait;

use super::{parse_lines, parse_log, GitBackend, LogEntry, FIELD_SEP};
use crate::error::{Result, ScribeError};
use crate::process;

/// [`GitBackend`] backed by the `git` executable in the working directory.
#[derive(Debug, Default, Clone)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        Self
    }

    async fn git(&self, args: Vec<String>) -> Result<String> {
        process::run("git", &args).await
    }
}

#[async_trait]
impl GitBackend for SystemGit {
    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<LogEntry>> {
        let format = format!("--pretty=format:%H{sep}%s{sep}%an", sep = FIELD_SEP);
        let output = self
            .git(process::args([
                "log".to_string(),
                format!("{base}..{head}"),
                format,
                "--reverse".to_string(),
            ]))
            .await?;
        Ok(parse_log(&output))
    }

    async fn current_branch(&self) -> Result<String> {
        let output = self
            .git(process::args(["rev-parse", "--abbrev-ref", "HEAD"]))
            .await?;
        Ok(output.trim().to_string())
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        self.git(process::args(["fetch", remote, "--tags", "--quiet"]))
            .await?;
        Ok(())
    }

    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let output = self
            .git(process::args([
                "diff".to_string(),
                format!("{from}...{to}"),
                "--name-only".to_string(),
            ]))
            .await?;
        Ok(parse_lines(&output))
    }

    async fn is_ancestor(&self, commit: &str, descendant: &str) -> Result<bool> {
        let args = process::args(["merge-base", "--is-ancestor", commit, descendant]);
        let out = process::output("git", &args).await?;
        // Exit 1 is the "not an ancestor" answer; anything else is a real failure.
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(ScribeError::command_failed(
                "git",
                &args,
                out.stderr.trim().to_string(),
            )),
        }
    }

    async fn version_tags(&self) -> Result<Vec<String>> {
        let output = self
            .git(process::args([
                "tag",
                "--list",
                "v*.*.*",
                "--sort=-version:refname",
            ]))
            .await?;
        Ok(parse_lines(&output))
    }
}
