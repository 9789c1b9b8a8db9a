#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gh_scribe::clipboard::Clipboard;
use gh_scribe::config::Config;
use gh_scribe::error::{GenerationError, Result, ScribeError};
use gh_scribe::git::{GitBackend, LogEntry};
use gh_scribe::github::{
    NewPullRequest, NewRelease, PlatformClient, PrDetails, PrMergeInfo, PrState, ReleaseSummary,
};
use gh_scribe::narrative::{NarrativeGenerator, TextGenerator};
use gh_scribe::ui::Prompter;
use gh_scribe::workflow::Services;

fn failure(program: &str, what: &str) -> ScribeError {
    ScribeError::command_failed(program, &[what.to_string()], format!("{what} failed"))
}

/// In-memory repository. Ranges are keyed `base..head`, diffs `from...to`.
#[derive(Default)]
pub struct FakeGit {
    pub branch: String,
    pub logs: HashMap<String, Vec<LogEntry>>,
    pub changed: HashMap<String, Vec<String>>,
    /// `(commit, descendant)` pairs that are ancestors.
    pub ancestors: HashSet<(String, String)>,
    pub tags: Vec<String>,
    pub fail_log: bool,
    pub fail_fetch: bool,
    pub fail_ancestor: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            branch: "feature/add-login".to_string(),
            ..Default::default()
        }
    }

    pub fn with_log(mut self, base: &str, head: &str, commits: &[(&str, &str)]) -> Self {
        let entries = commits
            .iter()
            .map(|(hash, subject)| LogEntry {
                hash: hash.to_string(),
                subject: subject.to_string(),
                author: "dev".to_string(),
            })
            .collect();
        self.logs.insert(format!("{base}..{head}"), entries);
        self
    }

    pub fn with_changed(mut self, from: &str, to: &str, paths: &[&str]) -> Self {
        self.changed.insert(
            format!("{from}...{to}"),
            paths.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    pub fn with_ancestor(mut self, commit: &str, descendant: &str) -> Self {
        self.ancestors
            .insert((commit.to_string(), descendant.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitBackend for FakeGit {
    async fn log_range(&self, base: &str, head: &str) -> Result<Vec<LogEntry>> {
        self.record(format!("log {base}..{head}"));
        if self.fail_log {
            return Err(failure("git", "log"));
        }
        Ok(self
            .logs
            .get(&format!("{base}..{head}"))
            .cloned()
            .unwrap_or_default())
    }

    async fn current_branch(&self) -> Result<String> {
        self.record("rev-parse".to_string());
        Ok(self.branch.clone())
    }

    async fn fetch(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {remote}"));
        if self.fail_fetch {
            return Err(failure("git", "fetch"));
        }
        Ok(())
    }

    async fn changed_paths(&self, from: &str, to: &str) -> Result<Vec<String>> {
        self.record(format!("diff {from}...{to}"));
        Ok(self
            .changed
            .get(&format!("{from}...{to}"))
            .cloned()
            .unwrap_or_default())
    }

    async fn is_ancestor(&self, commit: &str, descendant: &str) -> Result<bool> {
        self.record(format!("merge-base {commit} {descendant}"));
        if self.fail_ancestor {
            return Err(failure("git", "merge-base"));
        }
        Ok(self
            .ancestors
            .contains(&(commit.to_string(), descendant.to_string())))
    }

    async fn version_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }
}

/// In-memory host platform. Unknown PR numbers fail, like `gh pr view` does.
#[derive(Default)]
pub struct FakePlatform {
    pub details: HashMap<u64, PrDetails>,
    pub merge_info: HashMap<u64, PrMergeInfo>,
    pub releases: Vec<ReleaseSummary>,
    pub fail_releases: bool,
    pub fail_create_pr: bool,
    pub open_pr: Option<u64>,
    pub publish_error: Option<String>,
    pub detail_requests: Mutex<Vec<u64>>,
    pub mutations: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pr(mut self, number: u64, title: &str) -> Self {
        self.details
            .insert(number, PrDetails::new(number, title, "octocat"));
        self
    }

    pub fn with_pr_body(mut self, number: u64, title: &str, body: &str) -> Self {
        let mut details = PrDetails::new(number, title, "octocat");
        details.body = Some(body.to_string());
        self.details.insert(number, details);
        self
    }

    pub fn with_merged(self, number: u64, base: &str, oid: &str) -> Self {
        self.with_merge_info(number, PrState::Merged, base, Some(oid))
    }

    pub fn with_merge_info(
        mut self,
        number: u64,
        state: PrState,
        base: &str,
        oid: Option<&str>,
    ) -> Self {
        self.merge_info.insert(
            number,
            PrMergeInfo {
                state: Some(state),
                base_ref_name: Some(base.to_string()),
                merge_commit_oid: oid.map(str::to_string),
            },
        );
        self
    }

    pub fn with_release(mut self, tag: &str, is_prerelease: bool) -> Self {
        self.releases.push(ReleaseSummary {
            tag_name: tag.to_string(),
            is_draft: false,
            is_prerelease,
        });
        self
    }

    pub fn with_draft_release(mut self, tag: &str) -> Self {
        self.releases.push(ReleaseSummary {
            tag_name: tag.to_string(),
            is_draft: true,
            is_prerelease: false,
        });
        self
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> Vec<u64> {
        self.detail_requests.lock().unwrap().clone()
    }

    fn mutate(&self, entry: String) {
        self.mutations.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl PlatformClient for FakePlatform {
    async fn pr_details(&self, number: u64) -> Result<PrDetails> {
        self.detail_requests.lock().unwrap().push(number);
        // Let the other in-flight lookups interleave.
        tokio::task::yield_now().await;
        self.details
            .get(&number)
            .cloned()
            .ok_or_else(|| failure("gh", "pr view"))
    }

    async fn pr_merge_info(&self, number: u64) -> Result<PrMergeInfo> {
        self.merge_info
            .get(&number)
            .cloned()
            .ok_or_else(|| failure("gh", "pr view"))
    }

    async fn create_pr(&self, pr: &NewPullRequest) -> Result<String> {
        if self.fail_create_pr {
            return Err(failure("gh", "pr create"));
        }
        self.mutate(format!("create_pr {} <- {}: {}", pr.base, pr.head, pr.title));
        Ok("https://github.com/acme/widgets/pull/99".to_string())
    }

    async fn find_open_pr(&self, _base: &str, _head: &str) -> Result<Option<u64>> {
        Ok(self.open_pr)
    }

    async fn edit_pr(&self, number: u64, title: &str, _body: &str) -> Result<()> {
        self.mutate(format!("edit_pr #{number}: {title}"));
        Ok(())
    }

    async fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseSummary>> {
        if self.fail_releases {
            return Err(failure("gh", "release list"));
        }
        Ok(self.releases.iter().take(limit).cloned().collect())
    }

    async fn create_release(&self, release: &NewRelease) -> Result<String> {
        self.mutate(format!(
            "create_release {} draft={} target={}",
            release.tag, release.draft, release.target
        ));
        Ok(format!(
            "https://github.com/acme/widgets/releases/tag/{}",
            release.tag
        ))
    }

    async fn publish_release(&self, tag: &str) -> Result<String> {
        if let Some(message) = &self.publish_error {
            return Err(ScribeError::command_failed(
                "gh",
                &["release".to_string(), "edit".to_string(), tag.to_string()],
                message.clone(),
            ));
        }
        self.mutate(format!("publish_release {tag}"));
        Ok(String::new())
    }
}

/// Returns a fixed reply and records every prompt.
pub struct FakeGenerator {
    pub reply: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _model: &str,
        _timeout: Duration,
    ) -> std::result::Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn copy(&self, text: &str) -> Result<()> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Answers every confirmation with the same value.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answer: bool,
    pub asked: Mutex<Vec<String>>,
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}

pub const GENERATED: &str = "- Add login (#12) (abc1234)";

/// Everything a workflow needs, wired to fakes.
pub struct Harness {
    pub config: Config,
    pub git: FakeGit,
    pub platform: FakePlatform,
    pub narrator: NarrativeGenerator,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub clipboard: RecordingClipboard,
    pub prompter: ScriptedPrompter,
}

impl Harness {
    pub fn new(git: FakeGit, platform: FakePlatform) -> Self {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let generator = FakeGenerator {
            reply: GENERATED.to_string(),
            prompts: prompts.clone(),
        };
        let config = Config::default();
        let narrator = NarrativeGenerator::from_config(Box::new(generator), &config.ai)
            .expect("templates compile");
        Self {
            config,
            git,
            platform,
            narrator,
            prompts,
            clipboard: RecordingClipboard::default(),
            prompter: ScriptedPrompter::default(),
        }
    }

    pub fn services(&self) -> Services<'_> {
        Services {
            config: &self.config,
            git: &self.git,
            platform: &self.platform,
            narrator: &self.narrator,
            clipboard: &self.clipboard,
            prompter: &self.prompter,
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn copied(&self) -> Vec<String> {
        self.clipboard.copied.lock().unwrap().clone()
    }
}
