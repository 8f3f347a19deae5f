//! Batch command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use branchnet_core::{Miner, parse_batch};
use clap::Args;
use tracing::warn;

use super::{Session, print_report};
use crate::cli::GlobalArgs;

/// Arguments for the batch command.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file with one owner,name pair per line
    pub input: PathBuf,

    /// Continue each repository from its checkpoint if present
    #[arg(long)]
    pub resume: bool,
}

/// Runs the batch command.
pub fn run(args: BatchArgs, global: &GlobalArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input = parse_batch(&content);
    if input.entries.is_empty() {
        warn!(path = %args.input.display(), "no repository to mine");
        println!("No repository to mine ({} lines skipped)", input.skipped.len());
        return Ok(());
    }

    let session = Session::open(global)?;
    let options = session.miner_options().with_resume(args.resume);
    let report = Miner::new(&session.gateway, options).mine_batch(&input);

    for mined in &report.mined {
        print_report(mined);
    }
    for (entry, err) in &report.failed {
        eprintln!("Failed to mine {entry}: {err}");
    }

    if !report.is_success() {
        bail!(
            "{} of {} repositories failed",
            report.failed.len(),
            input.entries.len()
        );
    }
    Ok(())
}
