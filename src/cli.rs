use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gh-scribe", version)]
#[command(about = "Draft GitHub release notes and pull request descriptions from merged PRs")]
pub struct Cli {
    /// Configuration file (default: .gh-scribe.toml, .github/gh-scribe.toml or gh-scribe.config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and manage PR descriptions
    Pr {
        /// Source branch (default: current branch, or the develop branch for release PRs)
        #[arg(short, long)]
        source: Option<String>,

        /// Target branch
        #[arg(short, long)]
        target: Option<String>,

        /// Copy the description to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Create the PR, or update the open one for the same branches
        #[arg(long)]
        create: bool,

        /// Preview without creating anything
        #[arg(short, long)]
        dry_run: bool,

        /// Create a release PR; VERSION is major, minor, patch or an explicit version
        #[arg(
            short,
            long,
            value_name = "VERSION",
            num_args = 0..=1,
            default_missing_value = "patch"
        )]
        release: Option<String>,
    },

    /// Create a GitHub release with generated notes
    Release {
        /// Version bump (major, minor, patch) or an explicit version
        #[arg(default_value = "patch")]
        version: String,

        /// Preview without creating anything
        #[arg(short, long)]
        dry_run: bool,

        /// Copy the release notes to the clipboard
        #[arg(short, long)]
        copy: bool,

        /// Create the release as a draft (default)
        #[arg(long, conflicts_with = "publish")]
        draft: bool,

        /// Publish the release immediately
        #[arg(long)]
        publish: bool,

        /// Target branch (default: the configured main branch)
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Publish a draft release
    Publish {
        /// Version to publish, e.g. v3.0.1 or 3.0.1
        version: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_release_flag_without_value_means_patch() {
        match parse(&["gh-scribe", "pr", "-r", "--create"]).command {
            Commands::Pr {
                release, create, ..
            } => {
                assert_eq!(release.as_deref(), Some("patch"));
                assert!(create);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_release_flag_with_value() {
        match parse(&["gh-scribe", "pr", "--release", "minor", "-d"]).command {
            Commands::Pr {
                release, dry_run, ..
            } => {
                assert_eq!(release.as_deref(), Some("minor"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_plain_pr() {
        match parse(&["gh-scribe", "pr", "-s", "feat/x", "-t", "develop", "-c"]).command {
            Commands::Pr {
                source,
                target,
                copy,
                release,
                ..
            } => {
                assert_eq!(source.as_deref(), Some("feat/x"));
                assert_eq!(target.as_deref(), Some("develop"));
                assert!(copy);
                assert!(release.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_release_defaults() {
        let cli = parse(&["gh-scribe", "release", "--verbose"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Release {
                version,
                publish,
                branch,
                ..
            } => {
                assert_eq!(version, "patch");
                assert!(!publish);
                assert!(branch.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_draft_conflicts_with_publish() {
        assert!(Cli::try_parse_from(["gh-scribe", "release", "--draft", "--publish"]).is_err());
    }

    #[test]
    fn test_publish_requires_version() {
        assert!(Cli::try_parse_from(["gh-scribe", "publish"]).is_err());
        let cli = parse(&["gh-scribe", "--config", "ci.toml", "publish", "3.0.1"]);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Commands::Publish { version } if version == "3.0.1"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
