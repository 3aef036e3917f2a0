//! semrel-gitlab - CLI entry point.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use semrel_provider_gitlab::{CreateReleaseConfig, GitLabRepository, Provider};

/// Query and publish releases on a GitLab project.
#[derive(Parser, Debug)]
#[command(name = "semrel-gitlab")]
#[command(about = "Query and publish releases on a GitLab project")]
#[command(version)]
struct Cli {
    /// Provider option as KEY=VALUE (token, gitlab_projectid, gitlab_baseurl,
    /// gitlab_branch, strip_v_tag_prefix). Repeatable.
    #[arg(short = 'c', long = "config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    config: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show default branch and visibility
    Info,

    /// List commits between two revisions
    Commits {
        /// Start of the range
        from: String,
        /// End of the range
        to: String,
    },

    /// List tags that parse as semantic versions
    Releases {
        /// Only include tags matching this regular expression
        #[arg(long, default_value = "")]
        pattern: String,
    },

    /// Create a release
    Release {
        /// Version to release (without tag prefix)
        #[arg(long)]
        new_version: String,

        /// Commit the release tag points to
        #[arg(long)]
        sha: String,

        /// Release description
        #[arg(long, conflicts_with = "changelog_file")]
        changelog: Option<String>,

        /// Read the release description from a file
        #[arg(long)]
        changelog_file: Option<PathBuf>,
    },

    /// Print provider name and version
    Provider,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Serialize)]
struct ProviderSummary<'a> {
    name: &'a str,
    version: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config: HashMap<String, String> = cli.config.into_iter().collect();

    let repo = GitLabRepository::new(&config).context("Failed to initialize GitLab provider")?;

    match cli.command {
        Command::Info => {
            let info = repo.get_info().await.context("Failed to fetch project info")?;
            print_json(&info)?;
        }
        Command::Commits { from, to } => {
            let commits = repo
                .get_commits(&from, &to)
                .await
                .with_context(|| format!("Failed to fetch commits {from}...{to}"))?;
            print_json(&commits)?;
        }
        Command::Releases { pattern } => {
            let releases = repo
                .get_releases(&pattern)
                .await
                .context("Failed to fetch releases")?;
            print_json(&releases)?;
        }
        Command::Release {
            new_version,
            sha,
            changelog,
            changelog_file,
        } => {
            let changelog = match (changelog, changelog_file) {
                (Some(text), None) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read changelog {}", path.display()))?,
                (None, None) => String::new(),
                (Some(_), Some(_)) => bail!("--changelog and --changelog-file are exclusive"),
            };

            let request = CreateReleaseConfig {
                new_version,
                sha,
                changelog,
                prerelease: false,
            };
            repo.create_release(&request)
                .await
                .with_context(|| format!("Failed to create release {}", request.new_version))?;
            eprintln!("✓ Released {}", request.new_version);
        }
        Command::Provider => {
            print_json(&ProviderSummary {
                name: repo.name(),
                version: repo.version(),
            })?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
