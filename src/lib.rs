//! # gh-scribe
//!
//! Drafts GitHub release notes and pull request descriptions from the merged
//! PRs between two refs, using a hosted language model for the prose.
//!
//! The interesting part is [`changes::ChangeResolver::new_changes`], which
//! works out what a release branch still has to ship when feature PRs were
//! squash-merged and their original commits never reach the target branch.
//! Everything else is orchestration around `git`, `gh` and the Anthropic API.

/// Command-line interface definitions
pub mod cli;

/// Clipboard access through platform utilities
pub mod clipboard;

/// Configuration file discovery and defaults
pub mod config;

/// Commit ranges, PR references and squash-merge reconciliation
pub mod changes;

/// Error types
pub mod error;

/// Version-control backend
pub mod git;

/// Host-platform client backed by the `gh` CLI
pub mod github;

/// Prompt templates and text generation
pub mod narrative;

/// External command execution
pub mod process;

/// Fixed-delay retry for the generation transport
pub mod retry;

/// Terminal output and confirmation prompts
pub mod ui;

/// Semantic version parsing and bumping
pub mod version;

/// The `pr`, `release` and `publish` flows
pub mod workflow;
