//! Prose generation: prompt templates, the text-generation transport, and
//! the deterministic PR title helper.

pub mod anthropic;
pub mod generator;
pub mod prompts;
pub mod title;

pub use anthropic::AnthropicClient;
pub use generator::NarrativeGenerator;
pub use prompts::PromptBuilder;
pub use title::{release_pr_title, title_from_branch};

use async_trait::async_trait;
use std::time::Duration;

use crate::error::GenerationError;

/// A hosted language model that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One logical generation. Implementations may retry internally but must
    /// give up once `timeout` has elapsed.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<String, GenerationError>;
}
