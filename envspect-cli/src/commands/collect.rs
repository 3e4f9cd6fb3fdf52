//! Collect command - walk the account and write the report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};

use envspect_api::{
    CircleciClient, CircleciConfig, Collaboration, FollowedProject, GithubAccount, GithubClient,
};
use envspect_core::{RepoId, Report, Vcs};
use envspect_fetch::{Collector, CollectorOptions};

use super::{
    CIRCLE_TOKEN_ENV, CIRCLE_V1_API_ENV, CIRCLE_V2_API_ENV, GITHUB_API_ENV, GITHUB_TOKEN_ENV,
};
use crate::output::render_summary;
use crate::{Cli, OutputFormat};

/// Default report path.
const DEFAULT_OUTPUT: &str = "circleci-data.json";

/// Kind of account repositories are listed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum AccountType {
    /// An organization.
    #[default]
    Org,
    /// A personal user account.
    User,
}

/// Arguments for the collect command.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// CircleCI personal API token.
    #[arg(long, env = CIRCLE_TOKEN_ENV, hide_env_values = true)]
    pub circle_token: Option<String>,

    /// GitHub personal access token, for repository listing.
    #[arg(long, env = GITHUB_TOKEN_ENV, hide_env_values = true)]
    pub github_token: Option<String>,

    /// VCS the account's projects live on.
    #[arg(long, default_value = "github")]
    pub vcs: Vcs,

    /// Account (organization or username) to collect for.
    #[arg(long)]
    pub account: Option<String>,

    /// Whether the account is an organization or a personal user.
    #[arg(long, default_value = "org")]
    pub account_type: AccountType,

    /// CircleCI owner id; skips the collaboration lookup.
    #[arg(long)]
    pub owner_id: Option<String>,

    /// Restrict collection to specific repositories (repeatable).
    #[arg(long = "repo", value_name = "OWNER/NAME")]
    pub repos: Vec<RepoId>,

    /// Where to write the JSON report.
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Concurrent repository job ceiling (default: all at once).
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// CircleCI v2 API base URL.
    #[arg(long, env = CIRCLE_V2_API_ENV)]
    pub circle_v2_api: Option<String>,

    /// CircleCI v1.1 API base URL.
    #[arg(long, env = CIRCLE_V1_API_ENV)]
    pub circle_v1_api: Option<String>,

    /// GitHub API base URL.
    #[arg(long, env = GITHUB_API_ENV)]
    pub github_api: Option<String>,
}

impl CollectArgs {
    /// Arguments for a bare invocation: environment variables and defaults
    /// only. Clap reads the environment during parsing, so a hand-built
    /// value has to do the same.
    pub fn from_env() -> Self {
        Self {
            circle_token: env_var(CIRCLE_TOKEN_ENV),
            github_token: env_var(GITHUB_TOKEN_ENV),
            vcs: Vcs::GitHub,
            account: None,
            account_type: AccountType::Org,
            owner_id: None,
            repos: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            concurrency: None,
            circle_v2_api: env_var(CIRCLE_V2_API_ENV),
            circle_v1_api: env_var(CIRCLE_V1_API_ENV),
            github_api: env_var(GITHUB_API_ENV),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Runs the collect command.
pub async fn run(args: &CollectArgs, cli: &Cli) -> Result<()> {
    let token = args
        .circle_token
        .clone()
        .context("a CircleCI token is required (--circle-token or CIRCLE_TOKEN)")?;

    let mut config = CircleciConfig::new(token, args.vcs);
    if let Some(base) = &args.circle_v2_api {
        config = config.with_v2_base(base);
    }
    if let Some(base) = &args.circle_v1_api {
        config = config.with_v1_base(base);
    }
    let client = CircleciClient::new(config);

    let owner_id = resolve_owner_id(&client, args).await?;
    let repos = resolve_repos(&client, args).await?;
    info!(owner_id = %owner_id, repos = repos.len(), "Starting collection");

    let mut options = CollectorOptions::new();
    if let Some(limit) = args.concurrency {
        options = options.with_concurrency(limit);
    }
    let collector = Collector::with_options(client, options);

    let report = collector.collect(&owner_id, &repos).await?;
    if !report.unavailable.is_empty() {
        warn!(
            repos = report.unavailable.len(),
            "Some repositories could not be fully read"
        );
    }

    write_report(&report, &args.output)?;

    match cli.format {
        OutputFormat::Json => {
            let json = if cli.pretty {
                report.to_json_pretty()?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", render_summary(&report, &args.output));
            }
        }
    }

    Ok(())
}

/// Picks the owner id: an explicit flag wins, otherwise the collaboration
/// listing must name exactly one matching account.
async fn resolve_owner_id(client: &CircleciClient, args: &CollectArgs) -> Result<String> {
    if let Some(owner_id) = &args.owner_id {
        return Ok(owner_id.clone());
    }

    let collaborations = client.collaborations().await?;
    let chosen = select_account(collaborations, args.vcs, args.account.as_deref())?;
    debug!(account = %chosen.name, "Resolved owner id");
    Ok(chosen.id)
}

/// Narrows a collaboration listing down to exactly one account.
fn select_account(
    collaborations: Vec<Collaboration>,
    vcs: Vcs,
    account: Option<&str>,
) -> Result<Collaboration> {
    let mut candidates: Vec<_> = collaborations
        .into_iter()
        .filter(|c| c.is_on(vcs))
        .collect();
    let available: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    if let Some(account) = account {
        candidates.retain(|c| c.name.eq_ignore_ascii_case(account));
    }

    match candidates.len() {
        0 if available.is_empty() => anyhow::bail!(
            "token has no {vcs} collaborations; check --vcs or pass --owner-id"
        ),
        0 => anyhow::bail!(
            "no matching account; token can act for: {}",
            available.join(", ")
        ),
        1 => Ok(candidates.remove(0)),
        _ => {
            let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
            anyhow::bail!(
                "token can act for several accounts ({}); pick one with --account",
                names.join(", ")
            )
        }
    }
}

/// Picks the repositories to visit: explicit `--repo` flags win, otherwise
/// GitHub accounts get a full listing and Bitbucket accounts fall back to
/// the followed-project list.
async fn resolve_repos(client: &CircleciClient, args: &CollectArgs) -> Result<Vec<RepoId>> {
    if !args.repos.is_empty() {
        return Ok(args.repos.clone());
    }

    match args.vcs {
        Vcs::GitHub => {
            let token = args.github_token.clone().context(
                "a GitHub token is required to list repositories (--github-token or GITHUB_TOKEN)",
            )?;
            let github = match &args.github_api {
                Some(base) => GithubClient::with_base(token, base),
                None => GithubClient::new(token),
            };
            let account = match args.account_type {
                AccountType::Org => {
                    let name = args.account.clone().context(
                        "--account is required when listing an organization's repositories",
                    )?;
                    GithubAccount::Organization(name)
                }
                AccountType::User => GithubAccount::User,
            };
            Ok(github.list_repositories(&account).await?)
        }
        Vcs::Bitbucket => {
            let account = args
                .account
                .clone()
                .context("--account is required to pick Bitbucket projects from the followed list")?;
            let projects = client.followed_projects().await?;
            let repos: Vec<_> = projects
                .iter()
                .filter(|p| p.username.eq_ignore_ascii_case(&account))
                .map(FollowedProject::repo_id)
                .collect();
            info!(repos = repos.len(), "Selected followed Bitbucket projects");
            Ok(repos)
        }
    }
}

/// Writes the pretty-printed report to disk.
fn write_report(report: &Report, path: &Path) -> Result<()> {
    let json = report.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Report written");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
