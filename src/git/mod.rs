//! Version-control queries the tool depends on.
//!
//! Everything goes through the [`GitBackend`] trait so the change resolver can
//! be exercised against an in-memory repository in tests. [`SystemGit`] is the
//! real implementation and shells out to `git`.

mod system;

pub use system::SystemGit;

use async_trait::async_trait;

use crate::error::Result;

/// Field separator used in `git log --pretty` output. Subjects may contain `|`.
pub(crate) const FIELD_SEP: char = '\u{1f}';

/// One line of `git log`, before PR references are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hash: String,
    pub subject: String,
    pub author: String,
}

#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Commits reachable from `head` but not `base`, oldest first.
    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<LogEntry>>;

    async fn current_branch(&self) -> Result<String>;

    /// `git fetch <remote> --tags`
    async fn fetch(&self, remote: &str) -> Result<()>;

    /// Paths changed on `to` since its merge base with `from` (`from...to`).
    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>>;

    /// Whether `commit` is reachable from `descendant`.
    async fn is_ancestor(&self, commit: &str, descendant: &str) -> Result<bool>;

    /// `v*.*.*` tags, highest version first.
    async fn version_tags(&self) -> Result<Vec<String>>;
}

/// Parse output produced with `--pretty=format:%H<SEP>%s<SEP>%an`.
pub fn parse_log(output: &str) -> Vec<LogEntry> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.splitn(3, FIELD_SEP);
            let hash = fields.next()?.trim();
            if hash.is_empty() {
                return None;
            }
            Some(LogEntry {
                hash: hash.to_string(),
                subject: fields.next().unwrap_or_default().to_string(),
                author: fields.next().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Non-empty trimmed lines, used for path and tag listings.
pub fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
