//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Mine the commit network of a GitHub repository and its forks.
#[derive(Debug, Parser)]
#[command(name = "branchnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to the nearest branchnet.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub account name
    #[arg(short, long, global = true, env = "GITHUB_USER")]
    pub user: Option<String>,

    /// GitHub password or personal access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for exported files (overrides the configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mine one repository, its forks and their branches
    Mine(commands::mine::MineArgs),

    /// Mine every repository listed in an owner,name CSV file
    Batch(commands::batch::BatchArgs),

    /// Write the numeric id of every repository listed in a CSV file
    Resolve(commands::resolve::ResolveArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Mine(args) => commands::mine::run(args, &self.global),
            Commands::Batch(args) => commands::batch::run(args, &self.global),
            Commands::Resolve(args) => commands::resolve::run(args, &self.global),
        }
    }
}
