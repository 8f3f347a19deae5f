//! Resolve command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use branchnet_core::{parse_batch, render_resolved, resolve_ids};
use clap::Args;
use tracing::info;

use super::Session;
use crate::cli::GlobalArgs;

/// Arguments for the resolve command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// CSV file with one owner,name pair per line
    pub input: PathBuf,

    /// Output file (defaults to `<input stem>output.csv` next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Returns `<dir>/<stem>output.csv` for an input file.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}output.csv"))
}

/// Runs the resolve command.
pub fn run(args: ResolveArgs, global: &GlobalArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input = parse_batch(&content);

    let session = Session::open(global)?;
    let resolved = resolve_ids(&session.gateway, &input).context("failed to resolve ids")?;

    let output = args.output.unwrap_or_else(|| default_output(&args.input));
    fs::write(&output, render_resolved(&resolved))
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(path = %output.display(), rows = resolved.len(), "ids written");
    println!(
        "Resolved {} of {} repositories into {}",
        resolved.len(),
        input.entries.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_next_to_input() {
        assert_eq!(
            default_output(Path::new("data/repos.csv")),
            PathBuf::from("data/reposoutput.csv")
        );
        assert_eq!(
            default_output(Path::new("list")),
            PathBuf::from("listoutput.csv")
        );
    }
}
