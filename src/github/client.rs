use async_trait::async_trait;

use super::types::{
    GhMergeView, GhNumber, GhPullRequest, NewPullRequest, NewRelease, PrDetails, PrMergeInfo,
    ReleaseSummary,
};
use crate::error::{Result, ScribeError};
use crate::process;

const PR_DETAIL_FIELDS: &str = "number,title,author,body,labels,additions,deletions,\
changedFiles,mergeCommit,baseRefName,state,mergedAt";
const PR_MERGE_FIELDS: &str = "state,baseRefName,mergeCommit";

/// Host-platform operations. Reads feed the change resolver; writes are only
/// issued by the workflows outside dry-run.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn pr_details(&self, number: u64) -> Result<PrDetails>;

    async fn pr_merge_info(&self, number: u64) -> Result<PrMergeInfo>;

    /// Open a pull request and return whatever the platform printed (the URL).
    async fn create_pr(&self, pr: &NewPullRequest) -> Result<String>;

    /// Number of the first open PR from `head` into `base`, if any.
    async fn find_open_pr(&self, base: &str, head: &str) -> Result<Option<u64>>;

    async fn edit_pr(&self, number: u64, title: &str, body: &str) -> Result<()>;

    /// Most recent releases, newest first.
    async fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseSummary>>;

    async fn create_release(&self, release: &NewRelease) -> Result<String>;

    /// Flip a draft release to published.
    async fn publish_release(&self, tag: &str) -> Result<String>;
}

/// [`PlatformClient`] that drives the authenticated `gh` CLI.
#[derive(Debug, Clone, Default)]
pub struct GhCli {
    repo: Option<String>,
}

impl GhCli {
    pub fn new(repo: Option<String>) -> Self {
        Self { repo }
    }

    fn with_repo(&self, mut args: Vec<String>) -> Vec<String> {
        if let Some(repo) = &self.repo {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }
        args
    }

    async fn gh(&self, args: Vec<String>) -> Result<String> {
        let args = self.with_repo(args);
        process::run("gh", &args).await
    }
}

#[async_trait]
impl PlatformClient for GhCli {
    async fn pr_details(&self, number: u64) -> Result<PrDetails> {
        let output = self
            .gh(process::args([
                "pr".to_string(),
                "view".to_string(),
                number.to_string(),
                "--json".to_string(),
                PR_DETAIL_FIELDS.to_string(),
            ]))
            .await?;
        let raw: GhPullRequest = serde_json::from_str(&output)
            .map_err(|e| ScribeError::decode(format!("PR #{number}"), e))?;
        Ok(raw.into())
    }

    async fn pr_merge_info(&self, number: u64) -> Result<PrMergeInfo> {
        let output = self
            .gh(process::args([
                "pr".to_string(),
                "view".to_string(),
                number.to_string(),
                "--json".to_string(),
                PR_MERGE_FIELDS.to_string(),
            ]))
            .await?;
        let raw: GhMergeView = serde_json::from_str(&output)
            .map_err(|e| ScribeError::decode(format!("merge info for PR #{number}"), e))?;
        Ok(raw.into())
    }

    async fn create_pr(&self, pr: &NewPullRequest) -> Result<String> {
        let output = self
            .gh(process::args([
                "pr",
                "create",
                "--base",
                pr.base.as_str(),
                "--head",
                pr.head.as_str(),
                "--title",
                pr.title.as_str(),
                "--body",
                pr.body.as_str(),
            ]))
            .await?;
        Ok(output.trim().to_string())
    }

    async fn find_open_pr(&self, base: &str, head: &str) -> Result<Option<u64>> {
        let output = self
            .gh(process::args([
                "pr", "list", "--state", "open", "--base", base, "--head", head, "--json",
                "number",
            ]))
            .await?;
        let prs: Vec<GhNumber> = serde_json::from_str(&output)
            .map_err(|e| ScribeError::decode("open pull request list", e))?;
        Ok(prs.first().map(|pr| pr.number))
    }

    async fn edit_pr(&self, number: u64, title: &str, body: &str) -> Result<()> {
        self.gh(process::args([
            "pr".to_string(),
            "edit".to_string(),
            number.to_string(),
            "--title".to_string(),
            title.to_string(),
            "--body".to_string(),
            body.to_string(),
        ]))
        .await?;
        Ok(())
    }

    async fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseSummary>> {
        let output = self
            .gh(process::args([
                "release".to_string(),
                "list".to_string(),
                "--limit".to_string(),
                limit.to_string(),
                "--json".to_string(),
                "tagName,isDraft,isPrerelease".to_string(),
            ]))
            .await?;
        serde_json::from_str(&output).map_err(|e| ScribeError::decode("release list", e))
    }

    async fn create_release(&self, release: &NewRelease) -> Result<String> {
        let mut args = process::args([
            "release",
            "create",
            release.tag.as_str(),
            "--title",
            release.tag.as_str(),
            "--notes",
            release.notes.as_str(),
        ]);
        if release.draft {
            args.push("--draft".to_string());
        }
        args.push("--target".to_string());
        args.push(release.target.clone());

        let output = self.gh(args).await?;
        Ok(output.trim().to_string())
    }

    async fn publish_release(&self, tag: &str) -> Result<String> {
        let output = self
            .gh(process::args(["release", "edit", tag, "--draft=false"]))
            .await?;
        Ok(output.trim().to_string())
    }
}
