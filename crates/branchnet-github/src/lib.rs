//! Remote repository gateway for branchnet.
//!
//! This crate provides read-only access to a hosted repository:
//! - [`RepositoryGateway`]: The operations the traversal engine consumes
//! - [`GithubGateway`]: Blocking implementation over the GitHub REST API
//! - [`InMemoryGateway`]: Deterministic in-memory implementation
//! - [`RetryPolicy`]: Bounded retry with exponential backoff

mod error;
mod gateway;
mod github;
mod memory;
mod pagination;
mod retry;
mod types;

pub use error::{GatewayError, GatewayResult};
pub use gateway::RepositoryGateway;
pub use github::{DEFAULT_API_URL, GatewaySettings, GithubGateway};
pub use memory::{InMemoryGateway, InjectedFailure};
pub use pagination::next_page_url;
pub use retry::RetryPolicy;
pub use types::{
    BranchEntry, BranchListing, CommitDetail, CommitRef, Credentials, RepoHandle, RepoLocator,
};
