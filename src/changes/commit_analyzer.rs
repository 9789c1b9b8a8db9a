use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::git::LogEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub author: String,
    /// Every `#<digits>` reference in the message, in order, duplicates kept.
    pub pr_numbers: Vec<u64>,
}

impl CommitInfo {
    pub fn references_any(&self, numbers: &HashSet<u64>) -> bool {
        self.pr_numbers.iter().any(|n| numbers.contains(n))
    }
}

fn pr_reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\d+)").expect("valid PR reference pattern"))
}

pub struct CommitAnalyzer;

impl CommitAnalyzer {
    pub fn analyze_commits(entries: Vec<LogEntry>) -> Vec<CommitInfo> {
        entries.into_iter().map(Self::analyze_single_commit).collect()
    }

    fn analyze_single_commit(entry: LogEntry) -> CommitInfo {
        let pr_numbers = Self::extract_pr_numbers(&entry.subject);
        CommitInfo {
            hash: entry.hash,
            message: entry.subject,
            author: entry.author,
            pr_numbers,
        }
    }

    /// References like `(#123)` or `Merge pull request #45`. Numbers too large
    /// for `u64` are skipped.
    pub fn extract_pr_numbers(message: &str) -> Vec<u64> {
        pr_reference_re()
            .captures_iter(message)
            .filter_map(|cap| cap.get(1)?.as_str().parse::<u64>().ok())
            .collect()
    }

    /// Union of all references, in order of first sighting.
    pub fn collect_pr_numbers(commits: &[CommitInfo]) -> Vec<u64> {
        let mut seen = HashSet::new();
        commits
            .iter()
            .flat_map(|c| c.pr_numbers.iter().copied())
            .filter(|n| seen.insert(*n))
            .collect()
    }
}
