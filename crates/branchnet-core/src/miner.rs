//! Per-repository mining.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use branchnet_commit::CommitMap;
use branchnet_config::Config;
use branchnet_export::{CommitExporter, CsvExporter, GraphmlExporter, export_all};
use branchnet_github::{RepoHandle, RepoLocator, RepositoryGateway};
use tracing::{error, info, warn};

use crate::batch::{BatchEntry, BatchInput};
use crate::{
    CheckpointStore, CommitGraphBuilder, CoreError, CoreResult, Deadline, DiscoveredSeeds,
    ForkDiscovery, checkpoint_path,
};

/// Options for a [`Miner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerOptions {
    /// Directory receiving exports and checkpoints.
    pub results_dir: PathBuf,
    /// Write the CSV table.
    pub csv: bool,
    /// Write the GraphML document.
    pub graphml: bool,
    /// Seed for the GraphML color palettes.
    pub palette_seed: Option<u64>,
    /// Save a checkpoint after each seed.
    pub checkpoint: bool,
    /// Start from an existing checkpoint.
    pub resume: bool,
    /// Overall time limit per repository.
    pub deadline: Option<Duration>,
}

impl Default for MinerOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for MinerOptions {
    fn from(config: &Config) -> Self {
        Self {
            results_dir: config.output.results_dir.clone(),
            csv: config.output.csv,
            graphml: config.output.graphml,
            palette_seed: config.export.palette_seed,
            checkpoint: config.output.checkpoint,
            resume: false,
            deadline: config.network.run_deadline(),
        }
    }
}

impl MinerOptions {
    /// Sets whether to resume from a checkpoint.
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Sets the results directory.
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }
}

/// Outcome of mining one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningReport {
    /// Full name of the repository.
    pub repository: String,
    /// Distinct commits recorded.
    pub commits: usize,
    /// Parent links recorded.
    pub edges: usize,
    /// Seeds traversed, root seed included.
    pub seeds: usize,
    /// Forks found.
    pub forks: usize,
    /// Commits skipped after recoverable failures.
    pub skipped: usize,
    /// Export files written.
    pub outputs: Vec<PathBuf>,
    /// Processing time.
    pub elapsed: Duration,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Repositories mined successfully.
    pub mined: Vec<MiningReport>,
    /// Repositories that failed, with their error.
    pub failed: Vec<(BatchEntry, CoreError)>,
}

impl BatchReport {
    /// Returns true if every repository was mined.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Mines the commit network of repositories.
pub struct Miner<'g, G: ?Sized> {
    gateway: &'g G,
    options: MinerOptions,
}

impl<'g, G: RepositoryGateway + ?Sized> Miner<'g, G> {
    /// Creates a miner.
    #[must_use]
    pub fn new(gateway: &'g G, options: MinerOptions) -> Self {
        Self { gateway, options }
    }

    /// Returns the options in use.
    #[must_use]
    pub fn options(&self) -> &MinerOptions {
        &self.options
    }

    /// Mines one repository and writes its exports.
    ///
    /// When checkpointing is enabled, progress is saved after every seed and
    /// when the traversal fails.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-recoverable gateway failure, an exceeded
    /// deadline, or a checkpoint or export failure.
    pub fn mine(&self, locator: &RepoLocator) -> CoreResult<MiningReport> {
        let started = Instant::now();
        let repo = self.gateway.get_repository(locator)?;
        info!(repository = %repo.full_name, id = repo.id, "mining repository");

        let store = CheckpointStore::new(
            checkpoint_path(&self.options.results_dir, &repo.name),
            repo.full_name.clone(),
        );
        let mut commits = if self.options.resume {
            store.load()?.unwrap_or_default()
        } else {
            CommitMap::new()
        };

        let discovered = ForkDiscovery::new(self.gateway).seeds(&repo)?;

        let skipped = match self.traverse(&repo, &discovered, &mut commits, &store, started) {
            Ok(skipped) => skipped,
            Err(err) => {
                if self.options.checkpoint && !commits.is_empty() {
                    match store.save(&commits) {
                        Ok(()) => warn!(
                            path = %store.path().display(),
                            commits = commits.len(),
                            "mining interrupted, checkpoint saved"
                        ),
                        Err(save_err) => error!(error = %save_err, "failed to save checkpoint"),
                    }
                }
                return Err(err);
            }
        };

        let outputs = self.export(&commits, &repo.name)?;
        if skipped > 0 && self.options.checkpoint {
            warn!(
                path = %store.path().display(),
                skipped,
                "commits skipped, checkpoint kept: run again with --resume to fill the gaps"
            );
        } else {
            store.remove()?;
        }

        let elapsed = started.elapsed();
        info!(
            repository = %repo.full_name,
            commits = commits.len(),
            edges = commits.edge_count(),
            ?elapsed,
            "analysis processed"
        );

        Ok(MiningReport {
            repository: repo.full_name,
            commits: commits.len(),
            edges: commits.edge_count(),
            seeds: discovered.len(),
            forks: discovered.forks.len(),
            skipped,
            outputs,
            elapsed,
        })
    }

    /// Mines every entry of a batch, continuing past failures.
    pub fn mine_batch(&self, input: &BatchInput) -> BatchReport {
        let mut report = BatchReport::default();
        for (index, entry) in input.entries.iter().enumerate() {
            info!(
                repository = %entry,
                position = index + 1,
                total = input.entries.len(),
                "launching analysis"
            );
            match self.mine(&entry.locator()) {
                Ok(mined) => report.mined.push(mined),
                Err(err) => {
                    error!(repository = %entry, error = %err, "analysis failed");
                    report.failed.push((entry.clone(), err));
                }
            }
        }
        report
    }

    /// Traverses every seed, returning the number of skipped commits.
    fn traverse(
        &self,
        repo: &RepoHandle,
        discovered: &DiscoveredSeeds,
        commits: &mut CommitMap,
        store: &CheckpointStore,
        started: Instant,
    ) -> CoreResult<usize> {
        let deadline = self
            .options
            .deadline
            .map(|limit| Deadline::starting_at(started, limit));
        let mut builder = CommitGraphBuilder::new(self.gateway, repo).with_deadline(deadline);
        let mut skipped = 0;

        if !commits.is_empty() {
            let stats = builder.complete(commits)?;
            info!(
                new = stats.visited,
                total = commits.len(),
                "interrupted paths completed"
            );
            skipped += stats.skipped;
        }

        for seed in discovered.seeds() {
            info!(branch = %seed.branch, tip = %seed.tip, "parsing branch");
            let stats = builder.traverse(seed, commits)?;
            info!(
                branch = %seed.branch,
                new = stats.visited,
                total = commits.len(),
                "new commits found"
            );
            skipped += stats.skipped;

            if self.options.checkpoint {
                store.save(commits)?;
            }
        }

        Ok(skipped)
    }

    fn export(&self, commits: &CommitMap, repo_name: &str) -> CoreResult<Vec<PathBuf>> {
        let csv = CsvExporter::new();
        let graphml = GraphmlExporter::new(self.options.palette_seed);

        let mut exporters: Vec<&dyn CommitExporter> = Vec::new();
        if self.options.csv {
            exporters.push(&csv);
        }
        if self.options.graphml {
            exporters.push(&graphml);
        }

        Ok(export_all(
            commits,
            &self.options.results_dir,
            repo_name,
            &exporters,
        )?)
    }
}
