use handlebars::Handlebars;
use serde::Serialize;

use crate::error::Result;
use crate::github::PrDetails;

const RELEASE_NOTES: &str = "release_notes";
const PR_DESCRIPTION: &str = "pr_description";
const RELEASE_PR_DESCRIPTION: &str = "release_pr_description";

/// PR bodies are cut to this many characters in release prompts.
pub const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Serialize)]
struct PrSummary<'a> {
    number: u64,
    title: &'a str,
    author: &'a str,
    labels: String,
    commit: &'a str,
    excerpt: String,
    body: &'a str,
    additions: u64,
    deletions: u64,
    changed_files: u64,
}

impl<'a> PrSummary<'a> {
    fn from_details(pr: &'a PrDetails) -> Self {
        let body = pr.body.as_deref().filter(|b| !b.is_empty());
        PrSummary {
            number: pr.number,
            title: &pr.title,
            author: &pr.author,
            labels: if pr.labels.is_empty() {
                "None".to_string()
            } else {
                pr.labels.join(", ")
            },
            commit: pr.merge_commit_sha.as_deref().unwrap_or("unknown"),
            excerpt: body.map_or_else(|| "No description".to_string(), excerpt),
            body: body.unwrap_or("No description"),
            additions: pr.additions.unwrap_or(0),
            deletions: pr.deletions.unwrap_or(0),
            changed_files: pr.changed_files.unwrap_or(0),
        }
    }
}

#[derive(Serialize)]
struct NumberedLine<'a> {
    position: usize,
    message: &'a str,
}

fn excerpt(body: &str) -> String {
    if body.chars().count() > BODY_EXCERPT_CHARS {
        let head: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

fn summaries(prs: &[PrDetails]) -> Vec<PrSummary<'_>> {
    prs.iter().map(PrSummary::from_details).collect()
}

/// Renders the fixed prompt templates compiled into the binary.
pub struct PromptBuilder {
    registry: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle PR bodies.
        registry.register_escape_fn(handlebars::no_escape);

        registry.register_partial(
            "pr_summaries",
            include_str!("../../templates/pr_summaries.hbs"),
        )?;
        registry.register_template_string(
            RELEASE_NOTES,
            include_str!("../../templates/release_notes.hbs"),
        )?;
        registry.register_template_string(
            PR_DESCRIPTION,
            include_str!("../../templates/pr_description.hbs"),
        )?;
        registry.register_template_string(
            RELEASE_PR_DESCRIPTION,
            include_str!("../../templates/release_pr_description.hbs"),
        )?;

        Ok(Self { registry })
    }

    pub fn release_notes(
        &self,
        prs: &[PrDetails],
        version: &str,
        previous_version: Option<&str>,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct Context<'a> {
            version: &'a str,
            previous_version: Option<&'a str>,
            prs: Vec<PrSummary<'a>>,
        }

        let context = Context {
            version,
            previous_version,
            prs: summaries(prs),
        };
        Ok(self.registry.render(RELEASE_NOTES, &context)?)
    }

    pub fn pr_description(
        &self,
        commit_messages: &[String],
        prs: &[PrDetails],
        target: &str,
        source: &str,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct Context<'a> {
            source: &'a str,
            target: &'a str,
            has_prs: bool,
            commit_count: usize,
            pr_count: usize,
            prs: Vec<PrSummary<'a>>,
            commits: Vec<NumberedLine<'a>>,
        }

        let context = Context {
            source,
            target,
            has_prs: !prs.is_empty(),
            commit_count: commit_messages.len(),
            pr_count: prs.len(),
            prs: summaries(prs),
            commits: commit_messages
                .iter()
                .enumerate()
                .map(|(i, message)| NumberedLine {
                    position: i + 1,
                    message,
                })
                .collect(),
        };
        Ok(self.registry.render(PR_DESCRIPTION, &context)?)
    }

    pub fn release_pr_description(&self, prs: &[PrDetails], version: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Context<'a> {
            version: &'a str,
            prs: Vec<PrSummary<'a>>,
        }

        let context = Context {
            version,
            prs: summaries(prs),
        };
        Ok(self.registry.render(RELEASE_PR_DESCRIPTION, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(number: u64, title: &str) -> PrDetails {
        PrDetails::new(number, title, "octocat")
    }

    #[test]
    fn test_release_notes_prompt() {
        let mut first = pr(1031, "Fix parameter population");
        first.labels = vec!["bug".to_string(), "api".to_string()];
        first.merge_commit_sha = Some("a69340b".to_string());
        first.body = Some("x".repeat(250));
        let second = pr(1040, "Add <b>dark</b> mode & themes");

        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .release_notes(&[first, second], "v1.4.0", Some("v1.3.2"))
            .unwrap();

        assert!(prompt.starts_with("You are creating release notes for version v1.4.0."));
        assert!(prompt.contains("The previous release was v1.3.2."));
        assert!(prompt.contains("PR #1031: Fix parameter population"));
        assert!(prompt.contains("Author: @octocat"));
        assert!(prompt.contains("Labels: bug, api"));
        assert!(prompt.contains("Commit: a69340b"));
        assert!(prompt.contains(&format!("Description: {}...", "x".repeat(200))));
        assert!(!prompt.contains(&"x".repeat(201)));
        // No HTML escaping.
        assert!(prompt.contains("PR #1040: Add <b>dark</b> mode & themes"));
        assert!(prompt.contains("Labels: None"));
        assert!(prompt.contains("Commit: unknown"));
        assert!(prompt.contains("Description: No description"));
        assert!(prompt.contains("## Contributors"));
    }

    #[test]
    fn test_release_notes_without_previous_version() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder.release_notes(&[], "v0.1.0", None).unwrap();
        assert!(!prompt.contains("previous release"));
    }

    #[test]
    fn test_pr_description_with_prs() {
        let mut details = pr(12, "Add login");
        details.additions = Some(40);
        details.deletions = Some(3);
        details.changed_files = Some(5);
        details.body = Some("y".repeat(300));

        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .pr_description(
                &["feat: add login (#12)".to_string(), "chore: tidy".to_string()],
                &[details],
                "main",
                "develop",
            )
            .unwrap();

        assert!(prompt.contains("merging develop into main"));
        assert!(prompt.contains("This PR includes 2 commits and 1 pull requests."));
        assert!(prompt.contains("Changes: +40 -3 in 5 files"));
        // Full body, not the excerpt.
        assert!(prompt.contains(&"y".repeat(300)));
        assert!(prompt.contains("Reference PRs as #123"));
        assert!(!prompt.contains("Commit messages:"));
    }

    #[test]
    fn test_pr_description_falls_back_to_commits() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .pr_description(
                &["fix: typo".to_string(), "chore: bump deps".to_string()],
                &[],
                "develop",
                "fix/typo",
            )
            .unwrap();

        assert!(prompt.contains("This PR includes 2 commits."));
        assert!(prompt.contains("1. fix: typo"));
        assert!(prompt.contains("2. chore: bump deps"));
        assert!(prompt.contains("Focus on the actual changes made"));
    }

    #[test]
    fn test_release_pr_description_prompt() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder
            .release_pr_description(&[pr(7, "Remove legacy flag")], "v2.0.0")
            .unwrap();
        assert!(prompt.contains("description for release v2.0.0"));
        assert!(prompt.contains("PR #7: Remove legacy flag"));
        assert!(prompt.contains("Output ONLY the bullet list."));
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let body = "é".repeat(201);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }
}
