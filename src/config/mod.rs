mod types;

pub use types::{AiConfig, Config, GithubConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

use std::path::{Path, PathBuf};

use crate::error::{Result, ScribeError};

/// Candidate files, relative to the working directory, in lookup order.
pub const CONFIG_CANDIDATES: [&str; 3] = [
    ".gh-scribe.toml",
    ".github/gh-scribe.toml",
    "gh-scribe.config.toml",
];

impl Config {
    /// Load configuration from an explicit file. A missing or malformed file is
    /// an error here, unlike [`Config::discover`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScribeError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ScribeError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Walk the candidate files under `dir` and return the first one that
    /// parses. Unparsable files are skipped with a warning; with nothing
    /// usable the defaults apply.
    pub fn discover(dir: &Path) -> Self {
        for candidate in Self::candidate_paths(dir) {
            if !candidate.exists() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(config) => {
                    tracing::debug!("Loaded configuration from {}", candidate.display());
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring config file: {}", e),
            }
        }
        Config::default()
    }

    pub fn candidate_paths(dir: &Path) -> Vec<PathBuf> {
        CONFIG_CANDIDATES.iter().map(|name| dir.join(name)).collect()
    }

    /// Resolve the process configuration: an explicit `--config` path wins,
    /// otherwise the search path under the current directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let cwd = std::env::current_dir()?;
                Ok(Self::discover(&cwd))
            }
        }
    }
}
