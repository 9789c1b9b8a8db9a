use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gh_scribe::cli::{Cli, Commands};
use gh_scribe::clipboard::SystemClipboard;
use gh_scribe::config::Config;
use gh_scribe::error::ScribeError;
use gh_scribe::git::SystemGit;
use gh_scribe::github::GhCli;
use gh_scribe::narrative::{AnthropicClient, NarrativeGenerator};
use gh_scribe::ui::{self, TerminalPrompter};
use gh_scribe::workflow::{self, PrOptions, ReleaseOptions, Services};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the generated text.
    let filter = if cli.verbose {
        EnvFilter::new("gh_scribe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    tracing::debug!("Configuration: {:?}", config);

    let git = SystemGit::new();
    let platform = GhCli::new(config.github.repo.clone());

    match cli.command {
        Commands::Pr {
            source,
            target,
            copy,
            create,
            dry_run,
            release,
        } => {
            let narrator = narrator(cli.api_key, &config)?;
            let services = Services {
                config: &config,
                git: &git,
                platform: &platform,
                narrator: &narrator,
                clipboard: &SystemClipboard,
                prompter: &TerminalPrompter,
            };
            let options = PrOptions {
                source,
                target,
                copy,
                create,
                dry_run,
                release,
            };
            let outcome = workflow::run_pr(&services, &options).await?;
            tracing::debug!("pr finished: {:?}", outcome);
        }
        Commands::Release {
            version,
            dry_run,
            copy,
            draft: _,
            publish,
            branch,
        } => {
            let narrator = narrator(cli.api_key, &config)?;
            let services = Services {
                config: &config,
                git: &git,
                platform: &platform,
                narrator: &narrator,
                clipboard: &SystemClipboard,
                prompter: &TerminalPrompter,
            };
            let options = ReleaseOptions {
                bump: version,
                dry_run,
                copy,
                publish,
                branch,
            };
            let outcome = workflow::run_release(&services, &options).await?;
            tracing::debug!("release finished: {:?}", outcome);
        }
        Commands::Publish { version } => {
            workflow::run_publish(&platform, &version).await?;
        }
    }

    Ok(())
}

fn narrator(api_key: Option<String>, config: &Config) -> Result<NarrativeGenerator> {
    if config.ai.provider != "anthropic" {
        bail!("Unsupported AI provider: {}", config.ai.provider);
    }
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(ScribeError::MissingApiKey)?;
    let client = AnthropicClient::from_config(api_key, &config.ai);
    Ok(NarrativeGenerator::from_config(Box::new(client), &config.ai)?)
}
