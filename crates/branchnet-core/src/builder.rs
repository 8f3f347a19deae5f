//! Commit ancestry traversal.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use branchnet_commit::{BranchSeed, CommitMap, CommitRecord, short};
use branchnet_github::{RepoHandle, RepositoryGateway};
use tracing::{debug, warn};

use crate::identity::resolve_committer;
use crate::{CoreError, CoreResult};

/// Overall time limit for a run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Starts a deadline now.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self::starting_at(Instant::now(), limit)
    }

    /// Starts a deadline at `started`.
    #[must_use]
    pub fn starting_at(started: Instant, limit: Duration) -> Self {
        Self { started, limit }
    }

    /// The configured limit.
    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Returns true once the limit is reached.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }
}

/// Counters for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Commits fetched and recorded.
    pub visited: usize,
    /// Popped commits that were already in the map.
    pub already_known: usize,
    /// Commits skipped after a recoverable gateway failure.
    pub skipped: usize,
}

impl std::ops::AddAssign for TraversalStats {
    fn add_assign(&mut self, other: Self) {
        self.visited += other.visited;
        self.already_known += other.already_known;
        self.skipped += other.skipped;
    }
}

/// Walks parent links from branch tips into a [`CommitMap`].
///
/// The traversal is depth-first on an explicit stack: the first parent of a
/// commit is followed to the end of its path before the second parent is
/// considered. A commit already in the map is never fetched again and keeps
/// the branch it was first recorded with.
pub struct CommitGraphBuilder<'g, G: ?Sized> {
    gateway: &'g G,
    repo: &'g RepoHandle,
    deadline: Option<Deadline>,
    failed: HashSet<String>,
}

impl<'g, G: RepositoryGateway + ?Sized> CommitGraphBuilder<'g, G> {
    /// Creates a builder for commits of `repo`.
    #[must_use]
    pub fn new(gateway: &'g G, repo: &'g RepoHandle) -> Self {
        Self {
            gateway,
            repo,
            deadline: None,
            failed: HashSet::new(),
        }
    }

    /// Sets an overall deadline, checked before every fetch.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Deadline>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Records every ancestor of `seed.tip` not yet in `commits`, tagged with `seed.branch`.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-recoverable gateway failure or when the
    /// deadline is exceeded. Commits recorded so far stay in `commits`.
    pub fn traverse(
        &mut self,
        seed: &BranchSeed,
        commits: &mut CommitMap,
    ) -> CoreResult<TraversalStats> {
        let mut stats = TraversalStats::default();
        let mut stack = vec![seed.tip.clone()];

        while let Some(id) = stack.pop() {
            if commits.contains(&id) {
                stats.already_known += 1;
                continue;
            }
            if self.failed.contains(&id) {
                continue;
            }
            self.check_deadline()?;

            let detail = match self.gateway.get_commit(self.repo, &id) {
                Ok(detail) => detail,
                Err(err) if err.is_recoverable() => {
                    warn!(sha = %id, branch = %seed.branch, error = %err, "commit skipped");
                    self.failed.insert(id);
                    stats.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let (committer, source) = resolve_committer(self.gateway, &detail);
            debug!(
                sha = %short(&id),
                branch = %seed.branch,
                %committer,
                ?source,
                "extracting commit"
            );

            // Pushed in reverse so the first parent is popped first.
            stack.extend(
                detail
                    .parents
                    .iter()
                    .rev()
                    .filter(|parent| !commits.contains(parent))
                    .cloned(),
            );

            commits.insert(
                CommitRecord::new(
                    id,
                    seed.branch.clone(),
                    committer,
                    detail.timestamp,
                    detail.parents,
                )
                .with_message(detail.message)
                .with_url(detail.url),
            );
            stats.visited += 1;
        }

        Ok(stats)
    }

    /// Walks the parents that recorded commits point to but that are missing
    /// from `commits`, each tagged with its child's branch.
    ///
    /// Completes a map restored from an interrupted run.
    ///
    /// # Errors
    ///
    /// Same as [`traverse`](Self::traverse).
    pub fn complete(&mut self, commits: &mut CommitMap) -> CoreResult<TraversalStats> {
        let known: &CommitMap = commits;
        let frontier: Vec<BranchSeed> = known
            .iter()
            .flat_map(move |record| {
                record
                    .parents
                    .iter()
                    .filter(move |parent| !known.contains(parent))
                    .map(move |parent| BranchSeed::new(record.branch.clone(), parent.clone()))
            })
            .collect();

        let mut stats = TraversalStats::default();
        for seed in &frontier {
            stats += self.traverse(seed, commits)?;
        }
        Ok(stats)
    }

    fn check_deadline(&self) -> CoreResult<()> {
        match self.deadline {
            Some(deadline) if deadline.is_expired() => Err(CoreError::DeadlineExceeded {
                repository: self.repo.full_name.clone(),
                limit: deadline.limit(),
            }),
            _ => Ok(()),
        }
    }
}
