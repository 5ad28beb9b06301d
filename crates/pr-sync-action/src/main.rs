//! `sync-task-status`: set Asana task statuses from PR state

use action_config::{outputs, ActionConfig, Settings};
use anyhow::{Context, Result};
use asana_client::AsanaClient;
use gh_client::{build_client, TokenResolver};
use pr_sync_action::{event, logger, OUTPUT_DID_SET_STATUS, OUTPUT_STATUS_FIELD_VALUE};
use std::process::ExitCode;
use task_sync::{ReferenceExtractor, StatusSync, SyncError, SyncReport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = pr_sync_action::load_dotenv();
    logger::init();
    if let Some(path) = dotenv {
        log::debug!("Loaded .env file from: {:?}", path);
    }

    log::info!("Running...");
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            outputs::error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<ActionConfig, SyncError> {
    Ok(Settings::load()?.into_action_config()?)
}

async fn run() -> Result<()> {
    let config = load_config()?;

    let Some(event) = event::from_env(&config.main_branch_name)? else {
        return write_outputs(&SyncReport::default());
    };

    let tokens = TokenResolver::new(config.github_token.clone());
    let github = build_client(&tokens, None).await?;
    let tracker = AsanaClient::new(&config.asana_token)?;
    let extractor = ReferenceExtractor::new(&config.tracker_host)
        .with_context(|| format!("Invalid tracker host `{}`", config.tracker_host))?;

    let report = StatusSync::new(github, tracker, config, extractor)
        .run(&event)
        .await;
    log::info!(
        "Done: {} task(s), status set: {}, skipped: {}",
        report.outcomes.len(),
        report.did_set_status(),
        report.skipped()
    );

    write_outputs(&report)
}

fn write_outputs(report: &SyncReport) -> Result<()> {
    outputs::set_output(OUTPUT_DID_SET_STATUS, &report.did_set_status().to_string())
        .context("Failed to write step output")?;
    outputs::set_output(
        OUTPUT_STATUS_FIELD_VALUE,
        report.status_field_value().unwrap_or_default(),
    )
    .context("Failed to write step output")?;
    Ok(())
}
