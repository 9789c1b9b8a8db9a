use anyhow::{Context, Result};

use super::{detect_latest_version, next_version, refresh_remote, Outcome, Services};
use crate::changes::{fetch_pr_details, ChangeResolver};
use crate::github::NewPullRequest;
use crate::narrative::{release_pr_title, title_from_branch};
use crate::ui;

#[derive(Debug, Clone, Default)]
pub struct PrOptions {
    pub source: Option<String>,
    pub target: Option<String>,
    pub copy: bool,
    pub create: bool,
    pub dry_run: bool,
    /// Bump argument for a release PR (`major`, `minor`, `patch` or a version).
    pub release: Option<String>,
}

/// Draft, and optionally open, a pull request describing `source → target`.
pub async fn run_pr(services: &Services<'_>, options: &PrOptions) -> Result<Outcome> {
    let config = services.config;
    let is_release = options.release.is_some();

    let source = match &options.source {
        Some(branch) => branch.clone(),
        None if is_release => config.default_branch.clone(),
        None => services
            .git
            .current_branch()
            .await
            .context("Failed to determine the current branch")?,
    };
    let target = match &options.target {
        Some(branch) => branch.clone(),
        None if is_release || source == config.default_branch => config.main_branch.clone(),
        None => config.default_branch.clone(),
    };

    refresh_remote(services).await;
    ui::display_success(&format!("Comparing {} → {}", source, target));

    let resolver = ChangeResolver::new(services.git, services.platform, config);
    let changes = if is_release {
        resolver
            .new_changes(&config.remote_ref(&source), &config.remote_ref(&target))
            .await
    } else {
        resolver.commits_between(&target, &source).await
    };

    if changes.is_empty() {
        ui::display_warning(&format!(
            "No new changes found between {} → {}",
            source, target
        ));
        if is_release {
            ui::display_hint(&format!(
                "All changes in {} have already been merged to {}.",
                source, target
            ));
        }
        return Ok(Outcome::NoChanges);
    }

    let commit_messages = changes.commit_messages();
    ui::display_change_summary(&commit_messages, &changes.pr_numbers);

    let prs =
        fetch_pr_details(services.platform, &changes.pr_numbers, config.max_in_flight()).await;
    if !changes.pr_numbers.is_empty() {
        ui::display_success(&format!("Fetched {} PRs", prs.len()));
    }

    let (title, description) = match &options.release {
        Some(bump) => {
            let current = detect_latest_version(services.git, services.platform).await;
            let version = next_version(current, bump)?.to_string();
            ui::display_success(&format!(
                "Current version: {} → New version: {}",
                current.map_or_else(|| "none".to_string(), |v| v.to_string()),
                version
            ));

            ui::display_status("Generating release PR description...");
            let description = services
                .narrator
                .release_pr_description(&prs, &version)
                .await?;
            (release_pr_title(&version), description)
        }
        None => {
            ui::display_status("Generating PR description...");
            let description = services
                .narrator
                .pr_description(&commit_messages, &prs, &target, &source)
                .await?;
            (title_from_branch(&source), description)
        }
    };

    if options.dry_run || !options.create {
        ui::display_pr_preview(&title, &source, &target, &description);
    }

    if options.copy {
        services
            .clipboard
            .copy(&description)
            .await
            .context("Failed to copy PR description to clipboard")?;
        ui::display_success("PR description copied to clipboard!");
    }

    let mut created = None;
    if options.create && !options.dry_run {
        let request = NewPullRequest {
            base: target,
            head: source,
            title: title.clone(),
            body: description.clone(),
        };
        let result = open_or_update(services, &request).await?;
        ui::display_success(&result);
        created = Some(result);
    }

    Ok(Outcome::Drafted {
        title,
        body: description,
        created,
    })
}

/// Create the PR; when that fails because one is already open for the same
/// head and base, rewrite its title and body instead.
async fn open_or_update(services: &Services<'_>, request: &NewPullRequest) -> Result<String> {
    let create_err = match services.platform.create_pr(request).await {
        Ok(url) => return Ok(url),
        Err(e) => e,
    };
    tracing::info!("PR creation failed ({}), looking for an open PR", create_err);

    match services
        .platform
        .find_open_pr(&request.base, &request.head)
        .await
    {
        Ok(Some(number)) => {
            services
                .platform
                .edit_pr(number, &request.title, &request.body)
                .await
                .with_context(|| format!("Failed to update PR #{}", number))?;
            Ok(format!("Updated existing PR #{}", number))
        }
        Ok(None) => Err(create_err).context("Failed to create PR"),
        Err(e) => {
            tracing::warn!("Could not look up open PRs: {}", e);
            Err(create_err).context("Failed to create PR")
        }
    }
}
