//! In-memory gateway.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::{
    BranchListing, CommitDetail, CommitRef, GatewayError, GatewayResult, RepoHandle,
    RepoLocator, RepositoryGateway,
};

/// Failure injected into an [`InMemoryGateway`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Server error (HTTP 503), transient.
    Unavailable,
    /// Resource missing (HTTP 404), recoverable.
    NotFound,
    /// Bad credentials (HTTP 401), fatal.
    Unauthorized,
    /// Access refused to one resource (HTTP 403).
    Forbidden,
    /// Blocked for legal reasons (HTTP 451), recoverable.
    Blocked,
}

impl InjectedFailure {
    fn into_error(self, url: String) -> GatewayError {
        match self {
            Self::Unavailable => GatewayError::Status {
                url,
                status: 503,
                message: "Service Unavailable".to_string(),
            },
            Self::NotFound => GatewayError::NotFound { url },
            Self::Unauthorized => GatewayError::Status {
                url,
                status: 401,
                message: "Bad credentials".to_string(),
            },
            Self::Forbidden => GatewayError::Status {
                url,
                status: 403,
                message: "Resource not accessible".to_string(),
            },
            Self::Blocked => GatewayError::Status {
                url,
                status: 451,
                message: "Repository access blocked".to_string(),
            },
        }
    }
}

/// Deterministic gateway backed by in-memory data.
///
/// Repositories are keyed by `owner/name`. Commits are shared across the
/// whole fork network, as on the platform.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    repositories: Vec<RepoHandle>,
    forks: HashMap<String, Vec<String>>,
    branches: HashMap<String, BranchListing>,
    history: HashMap<String, Vec<String>>,
    commits: HashMap<String, CommitDetail>,
    raw_committers: HashMap<String, String>,
    commit_failures: HashMap<String, InjectedFailure>,
    branch_failures: HashMap<String, InjectedFailure>,
    raw_failures: HashMap<String, InjectedFailure>,
    commit_fetches: RefCell<HashMap<String, usize>>,
    raw_fetches: RefCell<usize>,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a repository.
    #[must_use]
    pub fn with_repository(mut self, repo: RepoHandle) -> Self {
        self.repositories.push(repo);
        self
    }

    /// Adds `fork` as a direct fork of `parent` (both by full name).
    ///
    /// The fork repository is registered if not already present.
    #[must_use]
    pub fn with_fork(mut self, parent: &str, fork: RepoHandle) -> Self {
        self.forks
            .entry(parent.to_string())
            .or_default()
            .push(fork.full_name.clone());
        if self.find(&fork.full_name).is_none() {
            self.repositories.push(fork);
        }
        self
    }

    /// Sets the branch listing of a repository.
    #[must_use]
    pub fn with_branches(mut self, repo: &str, listing: impl Into<BranchListing>) -> Self {
        self.branches.insert(repo.to_string(), listing.into());
        self
    }

    /// Sets the default-branch history of a repository, newest first.
    #[must_use]
    pub fn with_history(mut self, repo: &str, shas: &[&str]) -> Self {
        self.history.insert(
            repo.to_string(),
            shas.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Adds a commit.
    #[must_use]
    pub fn with_commit(mut self, commit: CommitDetail) -> Self {
        self.commits.insert(commit.sha.clone(), commit);
        self
    }

    /// Registers the committer name returned for a raw commit URL.
    #[must_use]
    pub fn with_raw_committer(mut self, url: &str, name: &str) -> Self {
        self.raw_committers.insert(url.to_string(), name.to_string());
        self
    }

    /// Makes every fetch of `sha` fail.
    #[must_use]
    pub fn fail_commit(mut self, sha: &str, failure: InjectedFailure) -> Self {
        self.commit_failures.insert(sha.to_string(), failure);
        self
    }

    /// Makes the branch listing of `repo` fail.
    #[must_use]
    pub fn fail_branches(mut self, repo: &str, failure: InjectedFailure) -> Self {
        self.branch_failures.insert(repo.to_string(), failure);
        self
    }

    /// Makes the raw committer lookup of `url` fail.
    #[must_use]
    pub fn fail_raw_committer(mut self, url: &str, failure: InjectedFailure) -> Self {
        self.raw_failures.insert(url.to_string(), failure);
        self
    }

    /// Returns how many times `sha` was fetched.
    #[must_use]
    pub fn commit_fetches(&self, sha: &str) -> usize {
        self.commit_fetches.borrow().get(sha).copied().unwrap_or(0)
    }

    /// Returns the total number of commit fetches.
    #[must_use]
    pub fn total_commit_fetches(&self) -> usize {
        self.commit_fetches.borrow().values().sum()
    }

    /// Returns how many raw committer lookups were made.
    #[must_use]
    pub fn raw_fetches(&self) -> usize {
        *self.raw_fetches.borrow()
    }

    fn find(&self, full_name: &str) -> Option<&RepoHandle> {
        self.repositories.iter().find(|r| r.full_name == full_name)
    }
}

impl RepositoryGateway for InMemoryGateway {
    fn get_repository(&self, locator: &RepoLocator) -> GatewayResult<RepoHandle> {
        let found = match locator {
            RepoLocator::Slug { .. } => self.find(&locator.to_string()),
            RepoLocator::Id(id) => self.repositories.iter().find(|r| r.id == *id),
        };
        found
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                url: format!("memory://repos/{locator}"),
            })
    }

    fn list_commits(&self, repo: &RepoHandle, limit: usize) -> GatewayResult<Vec<CommitRef>> {
        Ok(self
            .history
            .get(&repo.full_name)
            .map(|shas| {
                shas.iter()
                    .take(limit)
                    .map(|sha| CommitRef { sha: sha.clone() })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_commit(&self, repo: &RepoHandle, sha: &str) -> GatewayResult<CommitDetail> {
        *self
            .commit_fetches
            .borrow_mut()
            .entry(sha.to_string())
            .or_default() += 1;

        let url = format!("memory://repos/{}/commits/{sha}", repo.full_name);
        if let Some(failure) = self.commit_failures.get(sha) {
            return Err(failure.into_error(url));
        }
        self.commits
            .get(sha)
            .cloned()
            .ok_or(GatewayError::NotFound { url })
    }

    fn list_forks(&self, repo: &RepoHandle) -> GatewayResult<Vec<RepoHandle>> {
        Ok(self
            .forks
            .get(&repo.full_name)
            .map(|names| names.iter().filter_map(|n| self.find(n).cloned()).collect())
            .unwrap_or_default())
    }

    fn list_branches(&self, repo: &RepoHandle) -> GatewayResult<BranchListing> {
        if let Some(failure) = self.branch_failures.get(&repo.full_name) {
            return Err(failure.into_error(format!("memory://repos/{}/branches", repo.full_name)));
        }
        Ok(self
            .branches
            .get(&repo.full_name)
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_committer_name(&self, commit_url: &str) -> GatewayResult<Option<String>> {
        *self.raw_fetches.borrow_mut() += 1;
        if let Some(failure) = self.raw_failures.get(commit_url) {
            return Err(failure.into_error(commit_url.to_string()));
        }
        Ok(self.raw_committers.get(commit_url).cloned())
    }
}
