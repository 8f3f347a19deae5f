//! Mine command.

use anyhow::{Context, Result};
use branchnet_core::Miner;
use branchnet_github::RepoLocator;
use clap::Args;

use super::{Session, print_report};
use crate::cli::GlobalArgs;

/// Arguments for the mine command.
#[derive(Debug, Args)]
pub struct MineArgs {
    /// Repository as OWNER/NAME or numeric id
    pub repository: String,

    /// Continue from the checkpoint of an interrupted run
    #[arg(long)]
    pub resume: bool,
}

/// Runs the mine command.
pub fn run(args: MineArgs, global: &GlobalArgs) -> Result<()> {
    let locator: RepoLocator = args
        .repository
        .parse()
        .with_context(|| format!("invalid repository '{}'", args.repository))?;

    let session = Session::open(global)?;
    let options = session.miner_options().with_resume(args.resume);
    let report = Miner::new(&session.gateway, options)
        .mine(&locator)
        .with_context(|| format!("failed to mine {locator}"))?;

    print_report(&report);
    Ok(())
}
