use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integration branch feature work lands on.
    pub default_branch: String,
    /// Branch releases are cut from.
    pub main_branch: String,
    pub remote: String,
    /// Upper bound on concurrent per-PR `gh` queries.
    pub max_in_flight: usize,
    pub ai: AiConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// `owner/name`, passed to `gh --repo` when set.
    pub repo: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_branch: "develop".to_string(),
            main_branch: "main".to_string(),
            remote: "origin".to_string(),
            max_in_flight: 8,
            ai: AiConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            provider: "anthropic".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            max_attempts: 5,
            retry_delay_ms: 1000,
        }
    }
}

impl Config {
    /// `origin/<branch>` style ref for the configured remote.
    pub fn remote_ref(&self, branch: &str) -> String {
        format!("{}/{}", self.remote, branch)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.max(1)
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Never more than five attempts, never fewer than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.clamp(1, 5)
    }
}
