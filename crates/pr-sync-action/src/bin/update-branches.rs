//! `update-branches`: merge the main branch into open PRs

use action_config::{outputs, Settings};
use anyhow::{Context, Result};
use gh_client::{build_client, TokenResolver};
use pr_sync_action::{event, logger, BranchUpdater, OUTPUT_UPDATED_PULL_REQUESTS};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = pr_sync_action::load_dotenv();
    logger::init();
    if let Some(path) = dotenv {
        log::debug!("Loaded .env file from: {:?}", path);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            outputs::error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Settings::load()?.into_branch_update_config()?;
    let (owner, repo) = event::repository_from_env()?;

    let tokens = TokenResolver::new(config.github_token.clone());
    let github = build_client(&tokens, None).await?;

    let report = BranchUpdater::new(github, config).run(&owner, &repo).await?;
    if !report.failed.is_empty() {
        outputs::warning(&format!(
            "Could not update {} PR branch(es): {:?}",
            report.failed.len(),
            report.failed
        ));
    }
    log::info!("Updated {} PR branch(es)", report.updated.len());

    outputs::set_output(OUTPUT_UPDATED_PULL_REQUESTS, &report.updated.len().to_string())
        .context("Failed to write step output")?;
    Ok(())
}
