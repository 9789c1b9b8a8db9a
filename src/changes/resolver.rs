use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;

use super::commit_analyzer::{CommitAnalyzer, CommitInfo};
use crate::config::Config;
use crate::error::Result;
use crate::git::GitBackend;
use crate::github::{PlatformClient, PrState};

/// Commits in a range plus the PRs they reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Oldest first.
    pub commits: Vec<CommitInfo>,
    /// Order of first sighting.
    pub pr_numbers: Vec<u64>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn commit_messages(&self) -> Vec<String> {
        self.commits.iter().map(|c| c.message.clone()).collect()
    }
}

/// Works out which commits and PRs one ref has that another lacks.
///
/// Query failures never escape: they are logged and the caller sees an empty
/// [`ChangeSet`], the same as a range with nothing in it.
pub struct ChangeResolver<'a> {
    git: &'a dyn GitBackend,
    platform: &'a dyn PlatformClient,
    config: &'a Config,
}

impl<'a> ChangeResolver<'a> {
    pub fn new(
        git: &'a dyn GitBackend,
        platform: &'a dyn PlatformClient,
        config: &'a Config,
    ) -> Self {
        Self {
            git,
            platform,
            config,
        }
    }

    /// Plain `base..head` range.
    pub async fn commits_between(&self, base: &str, head: &str) -> ChangeSet {
        match self.range(base, head).await {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!("Could not list commits in {}..{}: {}", base, head, e);
                ChangeSet::default()
            }
        }
    }

    /// Commits on `source` that have not reached `target`, tolerating squash
    /// merges: a PR that was already squashed into `target` is dropped even
    /// though its original commits never appear there.
    pub async fn new_changes(&self, source: &str, target: &str) -> ChangeSet {
        match self.reconcile(source, target).await {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!("Could not compare {} against {}: {}", source, target, e);
                ChangeSet::default()
            }
        }
    }

    async fn range(&self, base: &str, head: &str) -> Result<ChangeSet> {
        let entries = self.git.log_range(base, head).await?;
        let commits = CommitAnalyzer::analyze_commits(entries);
        let pr_numbers = CommitAnalyzer::collect_pr_numbers(&commits);
        tracing::debug!(
            "{}..{}: {} commits, {} PR references",
            base,
            head,
            commits.len(),
            pr_numbers.len()
        );
        Ok(ChangeSet {
            commits,
            pr_numbers,
        })
    }

    async fn reconcile(&self, source: &str, target: &str) -> Result<ChangeSet> {
        let changed = self.git.changed_paths(target, source).await?;
        if changed.is_empty() {
            tracing::info!("No file differences between {} and {}", target, source);
            return Ok(ChangeSet::default());
        }

        let raw = self.range(target, source).await?;
        if raw.pr_numbers.is_empty() {
            return Ok(raw);
        }

        let verdicts: Vec<(u64, bool)> = stream::iter(raw.pr_numbers.iter().copied())
            .map(|number| async move { (number, self.already_landed(number, target).await) })
            .buffered(self.config.max_in_flight())
            .collect()
            .await;

        let pr_numbers: Vec<u64> = verdicts
            .into_iter()
            .filter(|(_, landed)| !landed)
            .map(|(number, _)| number)
            .collect();
        let included: HashSet<u64> = pr_numbers.iter().copied().collect();

        let commits: Vec<CommitInfo> = raw
            .commits
            .into_iter()
            .filter(|c| c.pr_numbers.is_empty() || c.references_any(&included))
            .collect();

        tracing::debug!(
            "{} PRs still pending for {}, {} commits kept",
            pr_numbers.len(),
            target,
            commits.len()
        );
        Ok(ChangeSet {
            commits,
            pr_numbers,
        })
    }

    /// Any lookup failure counts as "not landed" so the PR stays in.
    async fn already_landed(&self, number: u64, target: &str) -> bool {
        match self.merged_into(number, target).await {
            Ok(landed) => {
                if landed {
                    tracing::debug!("PR #{} already merged into {}", number, target);
                }
                landed
            }
            Err(e) => {
                tracing::warn!("Could not check PR #{}, keeping it: {}", number, e);
                false
            }
        }
    }

    async fn merged_into(&self, number: u64, target: &str) -> Result<bool> {
        let info = self.platform.pr_merge_info(number).await?;
        if info.state != Some(PrState::Merged) {
            return Ok(false);
        }
        let base_matches = info
            .base_ref_name
            .as_deref()
            .is_some_and(|base| same_branch(&self.config.remote, base, target));
        if !base_matches {
            return Ok(false);
        }
        match info.merge_commit_oid.as_deref() {
            Some(oid) => self.git.is_ancestor(oid, target).await,
            None => Ok(false),
        }
    }
}

/// `gh` reports bare branch names while callers usually pass remote tracking
/// refs such as `origin/main`.
fn same_branch(remote: &str, base_ref: &str, target: &str) -> bool {
    if base_ref == target {
        return true;
    }
    target
        .strip_prefix(remote)
        .and_then(|rest| rest.strip_prefix('/'))
        == Some(base_ref)
}
