//! The user-facing flows: release PRs and feature PRs, releases, publishing.
//!
//! Every external effect goes through the collaborators in [`Services`], so a
//! flow can be driven end to end against fakes.

pub mod pr;
pub mod publish;
pub mod release;

pub use pr::{run_pr, PrOptions};
pub use publish::run_publish;
pub use release::{run_release, ReleaseOptions};

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::Result;
use crate::git::GitBackend;
use crate::github::PlatformClient;
use crate::narrative::NarrativeGenerator;
use crate::ui::{self, Prompter};
use crate::version::{bump_version, parse_version, Version};

/// How many recent releases are inspected when looking for the current version.
pub const RELEASE_LOOKBACK: usize = 10;

/// Collaborators shared by the flows.
pub struct Services<'a> {
    pub config: &'a Config,
    pub git: &'a dyn GitBackend,
    pub platform: &'a dyn PlatformClient,
    pub narrator: &'a NarrativeGenerator,
    pub clipboard: &'a dyn Clipboard,
    pub prompter: &'a dyn Prompter,
}

/// How a flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to describe.
    NoChanges,
    /// The operator declined to continue.
    Cancelled,
    /// Text was generated. `created` carries the platform's response when a
    /// PR or release was actually created or updated.
    Drafted {
        title: String,
        body: String,
        created: Option<String>,
    },
}

/// Current released version: the newest non-prerelease among the recent
/// platform releases (drafts included), else the highest `v*.*.*` tag.
pub async fn detect_latest_version(
    git: &dyn GitBackend,
    platform: &dyn PlatformClient,
) -> Option<Version> {
    match platform.list_releases(RELEASE_LOOKBACK).await {
        Ok(releases) => {
            let found = releases
                .iter()
                .filter(|r| !r.is_prerelease)
                .find_map(|r| parse_version(&r.tag_name).map(|v| (v, r)));
            if let Some((version, release)) = found {
                tracing::info!(
                    "Latest version: {}{}",
                    release.tag_name,
                    if release.is_draft { " (draft)" } else { "" }
                );
                return Some(version);
            }
        }
        Err(e) => tracing::warn!("Could not list releases: {}", e),
    }

    match git.version_tags().await {
        Ok(tags) => {
            let found = tags.iter().find_map(|t| parse_version(t).map(|v| (v, t)));
            if let Some((version, tag)) = &found {
                tracing::info!("Latest version (from tags): {}", tag);
                return Some(*version);
            }
            None
        }
        Err(e) => {
            tracing::warn!("Could not list version tags: {}", e);
            None
        }
    }
}

/// Next version from the current one and a bump argument. Without a current
/// version the argument is taken literally when it parses, else `v0.1.0`.
pub fn next_version(current: Option<Version>, bump: &str) -> Result<Version> {
    match current {
        Some(version) => bump_version(version, bump),
        None => Ok(parse_version(bump).unwrap_or_else(Version::initial)),
    }
}

/// `git fetch <remote> --tags`; failure leaves us on local refs.
pub(crate) async fn refresh_remote(services: &Services<'_>) {
    let remote = &services.config.remote;
    match services.git.fetch(remote).await {
        Ok(()) => ui::display_success(&format!("Fetched latest from {}", remote)),
        Err(e) => {
            tracing::warn!("git fetch {} failed: {}", remote, e);
            ui::display_warning(&format!(
                "Could not fetch from {}; continuing with local refs",
                remote
            ));
        }
    }
}
