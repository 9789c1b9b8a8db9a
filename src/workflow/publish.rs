use anyhow::{anyhow, Context, Result};

use crate::error::ScribeError;
use crate::github::PlatformClient;
use crate::ui;
use crate::version::parse_version;

/// Flip the draft release for `version_arg` to published. Returns the
/// normalised tag (`3.0.1` becomes `v3.0.1`).
pub async fn run_publish(platform: &dyn PlatformClient, version_arg: &str) -> Result<String> {
    let version = parse_version(version_arg)
        .ok_or_else(|| ScribeError::InvalidVersion(version_arg.to_string()))?;
    let tag = version.to_string();

    ui::display_status(&format!("Publishing {}...", tag));
    match platform.publish_release(&tag).await {
        Ok(output) => {
            ui::display_success(&format!("Published {}", tag));
            if !output.is_empty() {
                ui::display_hint(&output);
            }
            Ok(tag)
        }
        Err(e) => {
            let message = e.to_string();
            if message.contains("release not found") {
                ui::display_hint("Tip: Use \"gh release list\" to see available releases");
                Err(anyhow!("Release {} not found.", version_arg))
            } else if message.contains("is not a draft") {
                Err(anyhow!("Release {} is already published.", version_arg))
            } else {
                Err(e).context("Failed to publish release")
            }
        }
    }
}
