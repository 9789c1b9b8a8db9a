use std::time::Duration;

use super::prompts::PromptBuilder;
use super::TextGenerator;
use crate::config::AiConfig;
use crate::error::{GenerationError, Result, ScribeError};
use crate::github::PrDetails;
use crate::ui;

/// Which entry point failed; only changes the advice shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    ReleaseNotes,
    PrDescription,
    ReleasePrDescription,
}

impl Purpose {
    fn label(self) -> &'static str {
        match self {
            Purpose::ReleaseNotes => "release notes",
            Purpose::PrDescription => "PR description",
            Purpose::ReleasePrDescription => "release PR description",
        }
    }

    fn capacity_tip(self) -> &'static str {
        match self {
            Purpose::PrDescription => "Tip: The API usually recovers within 30-60 seconds",
            _ => "Tip: You can use --dry-run to see what would be generated",
        }
    }
}

/// Turns PR and commit metadata into prose with one generation call per
/// request. Retries live in the transport, not here.
pub struct NarrativeGenerator {
    client: Box<dyn TextGenerator>,
    prompts: PromptBuilder,
    model: String,
    timeout: Duration,
}

impl NarrativeGenerator {
    pub fn new(
        client: Box<dyn TextGenerator>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client,
            prompts: PromptBuilder::new()?,
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(client: Box<dyn TextGenerator>, ai: &AiConfig) -> Result<Self> {
        Self::new(client, ai.model.clone(), ai.timeout())
    }

    pub async fn release_notes(
        &self,
        prs: &[PrDetails],
        version: &str,
        previous_version: Option<&str>,
    ) -> Result<String> {
        let prompt = self.prompts.release_notes(prs, version, previous_version)?;
        self.complete(Purpose::ReleaseNotes, &prompt).await
    }

    pub async fn pr_description(
        &self,
        commit_messages: &[String],
        prs: &[PrDetails],
        target: &str,
        source: &str,
    ) -> Result<String> {
        let prompt = self
            .prompts
            .pr_description(commit_messages, prs, target, source)?;
        self.complete(Purpose::PrDescription, &prompt).await
    }

    pub async fn release_pr_description(&self, prs: &[PrDetails], version: &str) -> Result<String> {
        let prompt = self.prompts.release_pr_description(prs, version)?;
        self.complete(Purpose::ReleasePrDescription, &prompt).await
    }

    async fn complete(&self, purpose: Purpose, prompt: &str) -> Result<String> {
        tracing::debug!("{} prompt is {} chars", purpose.label(), prompt.len());
        match self.client.generate(prompt, &self.model, self.timeout).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::error!("Error generating {}: {}", purpose.label(), e);
                advise(purpose, &e);
                Err(ScribeError::Generation(e))
            }
        }
    }
}

fn advise(purpose: Purpose, error: &GenerationError) {
    if error.is_capacity() {
        ui::display_warning("AI service is currently overloaded. Please try again in a few moments.");
        ui::display_hint(purpose.capacity_tip());
    } else if error.is_timeout() {
        ui::display_warning("Request timed out. The AI service might be slow.");
    }
}
