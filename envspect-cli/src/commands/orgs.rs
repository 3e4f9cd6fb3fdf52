//! Orgs command - list the accounts the token can act for.

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::json;

use envspect_api::{CircleciClient, CircleciConfig};
use envspect_core::Vcs;

use super::{CIRCLE_TOKEN_ENV, CIRCLE_V2_API_ENV};
use crate::{Cli, OutputFormat};

/// Arguments for the orgs command.
#[derive(Args, Debug)]
pub struct OrgsArgs {
    /// CircleCI personal API token.
    #[arg(long, env = CIRCLE_TOKEN_ENV, hide_env_values = true)]
    pub circle_token: Option<String>,

    /// Only show accounts on this VCS.
    #[arg(long)]
    pub vcs: Option<Vcs>,

    /// CircleCI v2 API base URL.
    #[arg(long, env = CIRCLE_V2_API_ENV)]
    pub circle_v2_api: Option<String>,
}

/// Runs the orgs command.
pub async fn run(args: &OrgsArgs, cli: &Cli) -> Result<()> {
    let token = args
        .circle_token
        .clone()
        .context("a CircleCI token is required (--circle-token or CIRCLE_TOKEN)")?;

    // The VCS only matters for project slugs, which this listing never
    // touches.
    let mut config = CircleciConfig::new(token, args.vcs.unwrap_or(Vcs::GitHub));
    if let Some(base) = &args.circle_v2_api {
        config = config.with_v2_base(base);
    }
    let client = CircleciClient::new(config);

    let mut collaborations = client.collaborations().await?;
    if let Some(vcs) = args.vcs {
        collaborations.retain(|c| c.is_on(vcs));
    }

    match cli.format {
        OutputFormat::Json => {
            let entries: Vec<_> = collaborations
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "name": c.name,
                        "vcs_type": c.vcs_type,
                    })
                })
                .collect();
            let json = if cli.pretty {
                serde_json::to_string_pretty(&entries)?
            } else {
                serde_json::to_string(&entries)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            if collaborations.is_empty() {
                println!("No accounts found for this token.");
            } else {
                for c in &collaborations {
                    println!("{:<24} {:<10} {}", c.name, c.vcs_type, c.id);
                }
            }
        }
    }

    Ok(())
}
