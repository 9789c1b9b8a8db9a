use anyhow::{Context, Result};

use super::{detect_latest_version, next_version, refresh_remote, Outcome, Services};
use crate::changes::{fetch_pr_details, ChangeResolver, CommitAnalyzer};
use crate::github::{NewRelease, PrDetails};
use crate::ui;

/// Range base used when the repository has never been released.
pub const UNRELEASED_BASE: &str = "HEAD~20";

#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// `major`, `minor`, `patch` or an explicit version.
    pub bump: String,
    pub dry_run: bool,
    pub copy: bool,
    /// Publish immediately instead of leaving a draft.
    pub publish: bool,
    /// Branch the release targets; the configured main branch by default.
    pub branch: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            bump: "patch".to_string(),
            dry_run: false,
            copy: false,
            publish: false,
            branch: None,
        }
    }
}

/// Generate release notes for the next version and create the release.
pub async fn run_release(services: &Services<'_>, options: &ReleaseOptions) -> Result<Outcome> {
    let config = services.config;

    let current = detect_latest_version(services.git, services.platform).await;
    let previous = current.map(|v| v.to_string());

    refresh_remote(services).await;

    let target_branch = options
        .branch
        .clone()
        .unwrap_or_else(|| config.main_branch.clone());
    let remote_target = config.remote_ref(&target_branch);
    let base = previous.as_deref().unwrap_or(UNRELEASED_BASE);

    let resolver = ChangeResolver::new(services.git, services.platform, config);
    let changes = resolver.commits_between(base, &remote_target).await;

    if changes.is_empty() {
        if let Some(last) = &previous {
            ui::display_warning(&format!("No changes since {}.", last));
            ui::display_hint("Tip: Merge your release PR first, then create the GitHub release.");
            ui::display_hint(&format!(
                "     gh-scribe pr --release {} --create",
                options.bump
            ));

            if options.dry_run {
                return Ok(Outcome::NoChanges);
            }
            let proceed = services.prompter.confirm(
                "No changes detected. Do you still want to create an empty release?",
                false,
            )?;
            if !proceed {
                ui::display_hint("Cancelled.");
                return Ok(Outcome::Cancelled);
            }
        }
    } else {
        ui::display_change_summary(&changes.commit_messages(), &changes.pr_numbers);
    }

    let version = next_version(current, &options.bump)?.to_string();
    ui::display_status(&format!("Generating release notes for {}...", version));

    let prs =
        fetch_pr_details(services.platform, &changes.pr_numbers, config.max_in_flight()).await;
    let notes = match find_release_pr(&prs, &version) {
        Some(release_pr) => {
            notes_from_release_pr(services, release_pr, &version, previous.as_deref()).await?
        }
        None => {
            services
                .narrator
                .release_notes(&prs, &version, previous.as_deref())
                .await?
        }
    };
    ui::display_success("Generated release notes");

    if options.dry_run {
        ui::display_preview("DRY RUN - Release Notes:", &notes);
    }

    if options.copy {
        services
            .clipboard
            .copy(&notes)
            .await
            .context("Failed to copy release notes to clipboard")?;
        ui::display_success("Release notes copied to clipboard!");
    }

    let mut created = None;
    if options.dry_run {
        ui::display_hint("This was a dry run. Use without --dry-run to create the release.");
        ui::display_hint("Tip: Create a release PR first with: gh-scribe pr --release");
    } else {
        let draft = !options.publish;
        let release = NewRelease {
            tag: version.clone(),
            notes: notes.clone(),
            draft,
            target: target_branch,
        };
        let result = services
            .platform
            .create_release(&release)
            .await
            .context("Failed to create GitHub release")?;
        ui::display_success(&format!(
            "Created {} release {}",
            if draft { "draft" } else { "published" },
            version
        ));
        if !result.is_empty() {
            ui::display_success(&result);
        }
        if draft {
            ui::display_hint("Tip: Use --publish to create a published release");
        }
        created = Some(result);
    }

    Ok(Outcome::Drafted {
        title: version,
        body: notes,
        created,
    })
}

/// The release PR merged for `version`, if it has a body to work from.
pub fn find_release_pr<'a>(prs: &'a [PrDetails], version: &str) -> Option<&'a PrDetails> {
    prs.iter()
        .find(|pr| pr.title.to_lowercase().contains("release") && pr.title.contains(version))
        .filter(|pr| pr.body.as_deref().is_some_and(|b| !b.is_empty()))
}

/// Notes built from the PRs a release PR lists, or its body verbatim when it
/// lists none.
async fn notes_from_release_pr(
    services: &Services<'_>,
    release_pr: &PrDetails,
    version: &str,
    previous: Option<&str>,
) -> Result<String> {
    let body = release_pr.body.clone().unwrap_or_default();
    let referenced = CommitAnalyzer::extract_pr_numbers(&body);
    tracing::info!(
        "Using release PR #{} ({} referenced PRs)",
        release_pr.number,
        referenced.len()
    );
    if referenced.is_empty() {
        return Ok(body);
    }

    let prs = fetch_pr_details(
        services.platform,
        &referenced,
        services.config.max_in_flight(),
    )
    .await;
    Ok(services
        .narrator
        .release_notes(&prs, version, previous)
        .await?)
}
