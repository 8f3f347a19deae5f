//! CLI commands.

pub mod batch;
pub mod mine;
pub mod resolve;

use anyhow::{Context, Result};
use branchnet_config::{Config, find_and_load_config, load_config};
use branchnet_core::{MinerOptions, MiningReport};
use branchnet_github::{GatewaySettings, GithubGateway, RetryPolicy};
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::credentials;

/// Configuration and gateway shared by the commands.
pub struct Session {
    pub config: Config,
    pub gateway: GithubGateway,
}

impl Session {
    /// Loads the configuration and opens the gateway.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let mut config = match &global.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => find_and_load_config().context("failed to load configuration")?,
        };
        if let Some(dir) = &global.results_dir {
            config.output.results_dir.clone_from(dir);
        }
        debug!(?config, "configuration loaded");

        let credentials = credentials::resolve(global.user.clone(), global.token.clone())?;
        let gateway = GithubGateway::new(gateway_settings(&config).with_credentials(credentials))
            .context("failed to create GitHub client")?;

        Ok(Self { config, gateway })
    }

    /// Miner options derived from the configuration.
    pub fn miner_options(&self) -> MinerOptions {
        MinerOptions::from(&self.config)
    }
}

fn gateway_settings(config: &Config) -> GatewaySettings {
    let network = &config.network;
    let settings = GatewaySettings::new(&config.github.api_url)
        .with_per_page(config.github.per_page)
        .with_timeout(network.request_timeout())
        .with_retry(RetryPolicy::new(
            network.max_retries,
            network.initial_backoff(),
            network.max_backoff(),
        ));

    match &config.github.user_agent {
        Some(agent) => settings.with_user_agent(agent),
        None => settings,
    }
}

/// Prints the summary of one mined repository.
fn print_report(report: &MiningReport) {
    println!(
        "{}: {} commits, {} edges from {} seeds across {} forks ({:.1}s)",
        report.repository,
        report.commits,
        report.edges,
        report.seeds,
        report.forks,
        report.elapsed.as_secs_f64()
    );
    if report.skipped > 0 {
        println!("  {} commits skipped after errors", report.skipped);
    }
    for path in &report.outputs {
        println!("  wrote {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_gateway_settings_from_config() {
        let mut config = Config::default();
        config.github.api_url = "https://github.example.com/api/v3/".to_string();
        config.github.per_page = 30;
        config.github.user_agent = Some("miner/1".to_string());
        config.network.request_timeout_secs = 5;

        let settings = gateway_settings(&config);
        assert_eq!(settings.api_url, "https://github.example.com/api/v3");
        assert_eq!(settings.per_page, 30);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.user_agent, "miner/1");
        assert!(settings.credentials.is_none());
    }
}
