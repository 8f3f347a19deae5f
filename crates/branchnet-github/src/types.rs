//! Types exchanged with the remote platform.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// Identifies a repository, either by `owner/name` or by numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoLocator {
    /// `owner/name` form.
    Slug { owner: String, name: String },
    /// Numeric repository id.
    Id(u64),
}

impl RepoLocator {
    /// Creates a slug locator.
    #[must_use]
    pub fn slug(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Slug {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoLocator {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse()
                .map(Self::Id)
                .map_err(|_| GatewayError::InvalidLocator(s.to_string()));
        }

        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::slug(owner, name))
            }
            _ => Err(GatewayError::InvalidLocator(s.to_string())),
        }
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug { owner, name } => write!(f, "{owner}/{name}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// A repository as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoHandle {
    /// Numeric repository id.
    pub id: u64,
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Name of the default branch.
    pub default_branch: String,
}

impl RepoHandle {
    /// Creates a handle with `master` as default branch.
    #[must_use]
    pub fn new(id: u64, owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            id,
            full_name: format!("{owner}/{name}"),
            owner,
            name,
            default_branch: "master".to_string(),
        }
    }

    /// Sets the default branch name.
    #[must_use]
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }
}

/// A commit reference from a commit listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRef {
    /// The commit hash.
    pub sha: String,
}

/// Full commit details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetail {
    /// The commit hash.
    pub sha: String,
    /// Parent hashes, in parent order.
    pub parents: Vec<String>,
    /// Platform account of the author, if linked.
    pub author_login: Option<String>,
    /// Author display name from the commit itself.
    pub author_name: Option<String>,
    /// Platform account of the committer, if linked.
    pub committer_login: Option<String>,
    /// Committer display name from the commit itself.
    pub committer_name: Option<String>,
    /// Full commit message.
    pub message: String,
    /// API URL of the commit.
    pub url: String,
    /// Committer date.
    pub timestamp: DateTime<Utc>,
}

impl CommitDetail {
    /// Creates a commit with the given parents and no identity information.
    #[must_use]
    pub fn new(sha: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            sha: sha.into(),
            parents: parents.iter().map(ToString::to_string).collect(),
            author_login: None,
            author_name: None,
            committer_login: None,
            committer_name: None,
            message: String::new(),
            url: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Sets the committer login.
    #[must_use]
    pub fn with_committer_login(mut self, login: impl Into<String>) -> Self {
        self.committer_login = Some(login.into());
        self
    }

    /// Sets the author login.
    #[must_use]
    pub fn with_author_login(mut self, login: impl Into<String>) -> Self {
        self.author_login = Some(login.into());
        self
    }

    /// Sets the committer display name.
    #[must_use]
    pub fn with_committer_name(mut self, name: impl Into<String>) -> Self {
        self.committer_name = Some(name.into());
        self
    }

    /// Sets the author display name.
    #[must_use]
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the API URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the committer date.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A branch and its tip commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEntry {
    /// Branch name.
    pub name: String,
    /// Tip commit hash.
    pub tip: String,
}

impl BranchEntry {
    /// Creates a branch entry.
    #[must_use]
    pub fn new(name: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip: tip.into(),
        }
    }
}

/// Branch list of a repository.
///
/// Entries missing a name or a tip are kept aside in `malformed`
/// (as raw JSON) instead of failing the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchListing {
    /// Well-formed branches, in listing order.
    pub branches: Vec<BranchEntry>,
    /// Raw text of entries that could not be interpreted.
    pub malformed: Vec<String>,
}

impl BranchListing {
    /// Builds a listing from raw JSON entries.
    #[must_use]
    pub fn from_values(values: Vec<serde_json::Value>) -> Self {
        let mut listing = Self::default();
        for value in values {
            let name = value.get("name").and_then(serde_json::Value::as_str);
            let tip = value
                .get("commit")
                .and_then(|c| c.get("sha"))
                .and_then(serde_json::Value::as_str);

            match (name, tip) {
                (Some(name), Some(tip)) => listing.branches.push(BranchEntry::new(name, tip)),
                _ => listing.malformed.push(value.to_string()),
            }
        }
        listing
    }
}

impl From<Vec<BranchEntry>> for BranchListing {
    fn from(branches: Vec<BranchEntry>) -> Self {
        Self {
            branches,
            malformed: Vec::new(),
        }
    }
}

/// Credentials sent with every API call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials from a username and a secret (password or token).
    #[must_use]
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Creates token-only credentials, sent as a bearer token.
    #[must_use]
    pub fn token(secret: impl Into<String>) -> Self {
        Self::new(String::new(), secret)
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"***")
            .finish()
    }
}
