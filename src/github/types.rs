use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state reported by `gh pr view --json state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Merged,
    Closed,
    #[serde(other)]
    Other,
}

/// Pull request metadata as consumed by the prompt builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrDetails {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changed_files: Option<u64>,
    /// Abbreviated to seven characters.
    pub merge_commit_sha: Option<String>,
    pub base_ref_name: Option<String>,
    pub state: Option<PrState>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PrDetails {
    /// Minimal record, mostly useful for tests and fallbacks.
    pub fn new(number: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            author: author.into(),
            body: None,
            labels: Vec::new(),
            additions: None,
            deletions: None,
            changed_files: None,
            merge_commit_sha: None,
            base_ref_name: None,
            state: None,
            merged_at: None,
        }
    }
}

/// The slice of PR state squash reconciliation needs. Keeps the full merge
/// commit oid, which the ancestor check requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrMergeInfo {
    pub state: Option<PrState>,
    pub base_ref_name: Option<String>,
    pub merge_commit_oid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    pub tag_name: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_prerelease: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag: String,
    pub notes: String,
    pub draft: bool,
    pub target: String,
}

// Raw `gh ... --json` payloads.

#[derive(Debug, Deserialize)]
pub(crate) struct GhLogin {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhCommitRef {
    pub oid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GhPullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub author: Option<GhLogin>,
    #[serde(default)]
    pub labels: Option<Vec<GhLabel>>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changed_files: Option<u64>,
    pub merge_commit: Option<GhCommitRef>,
    pub base_ref_name: Option<String>,
    pub state: Option<PrState>,
    pub merged_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GhMergeView {
    pub state: Option<PrState>,
    pub base_ref_name: Option<String>,
    pub merge_commit: Option<GhCommitRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GhNumber {
    pub number: u64,
}

fn short_sha(oid: &str) -> String {
    oid.chars().take(7).collect()
}

/// `gh` reports unset timestamps as null, empty, or the zero time depending on
/// version; all of those map to `None`.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
        .filter(|ts| ts.timestamp() > 0)
}

impl From<GhPullRequest> for PrDetails {
    fn from(pr: GhPullRequest) -> Self {
        PrDetails {
            number: pr.number,
            title: pr.title,
            author: pr.author.map(|a| a.login).unwrap_or_else(|| "ghost".to_string()),
            body: pr.body.filter(|b| !b.is_empty()),
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|l| l.name)
                .collect(),
            additions: pr.additions,
            deletions: pr.deletions,
            changed_files: pr.changed_files,
            merge_commit_sha: pr.merge_commit.map(|c| short_sha(&c.oid)),
            base_ref_name: pr.base_ref_name,
            state: pr.state,
            merged_at: parse_timestamp(pr.merged_at.as_deref()),
        }
    }
}

impl From<GhMergeView> for PrMergeInfo {
    fn from(view: GhMergeView) -> Self {
        PrMergeInfo {
            state: view.state,
            base_ref_name: view.base_ref_name,
            merge_commit_oid: view.merge_commit.map(|c| c.oid).filter(|oid| !oid.is_empty()),
        }
    }
}
