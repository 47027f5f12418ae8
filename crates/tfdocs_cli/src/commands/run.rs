//! Run command - the action itself.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use tfdocs_core::{Action, ActionConfig, Disposition};

use super::GlobalArgs;

#[derive(Args, Debug, Default)]
pub struct RunArgs {}

pub async fn execute(globals: &GlobalArgs, _args: RunArgs) -> Result<()> {
    let host = globals.host().context("Failed to detect the CI host environment")?;
    let config = ActionConfig::from_env();

    info!("Workspace: {}", host.workspace.display());

    let action = Action::new(config, host, globals.runner())
        .with_terraform_docs_binary(&globals.terraform_docs_bin);
    let outcome = action.run().await?;

    match outcome.disposition {
        Disposition::NoChanges => info!(
            "Documentation up to date for {} director(ies)",
            outcome.directories.len()
        ),
        Disposition::Pushed => info!("Pushed {} changed file(s)", outcome.num_changed),
        Disposition::LeftUncommitted => {
            info!("{} file(s) changed and left uncommitted", outcome.num_changed)
        }
    }

    Ok(())
}
