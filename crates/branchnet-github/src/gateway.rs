//! Remote repository gateway trait.

use crate::{
    BranchListing, CommitDetail, CommitRef, GatewayResult, RepoHandle, RepoLocator,
};

/// Read-only access to a hosted repository.
///
/// All operations block until the remote answers.
pub trait RepositoryGateway {
    /// Resolves a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be fetched.
    fn get_repository(&self, locator: &RepoLocator) -> GatewayResult<RepoHandle>;

    /// Lists up to `limit` commits of the default branch, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched.
    fn list_commits(&self, repo: &RepoHandle, limit: usize) -> GatewayResult<Vec<CommitRef>>;

    /// Fetches a single commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be fetched.
    fn get_commit(&self, repo: &RepoHandle, sha: &str) -> GatewayResult<CommitDetail>;

    /// Lists the direct forks of a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched.
    fn list_forks(&self, repo: &RepoHandle) -> GatewayResult<Vec<RepoHandle>>;

    /// Lists the branches of a repository.
    ///
    /// Malformed entries are reported in the listing, not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched.
    fn list_branches(&self, repo: &RepoHandle) -> GatewayResult<BranchListing>;

    /// Fetches a commit by its raw API URL and extracts the committer name.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be fetched.
    fn fetch_committer_name(&self, commit_url: &str) -> GatewayResult<Option<String>>;
}

impl<G: RepositoryGateway + ?Sized> RepositoryGateway for &G {
    fn get_repository(&self, locator: &RepoLocator) -> GatewayResult<RepoHandle> {
        (**self).get_repository(locator)
    }

    fn list_commits(&self, repo: &RepoHandle, limit: usize) -> GatewayResult<Vec<CommitRef>> {
        (**self).list_commits(repo, limit)
    }

    fn get_commit(&self, repo: &RepoHandle, sha: &str) -> GatewayResult<CommitDetail> {
        (**self).get_commit(repo, sha)
    }

    fn list_forks(&self, repo: &RepoHandle) -> GatewayResult<Vec<RepoHandle>> {
        (**self).list_forks(repo)
    }

    fn list_branches(&self, repo: &RepoHandle) -> GatewayResult<BranchListing> {
        (**self).list_branches(repo)
    }

    fn fetch_committer_name(&self, commit_url: &str) -> GatewayResult<Option<String>> {
        (**self).fetch_committer_name(commit_url)
    }
}
