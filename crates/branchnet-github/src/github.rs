//! GitHub REST API gateway.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, LINK, RETRY_AFTER};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    BranchListing, CommitDetail, CommitRef, Credentials, GatewayError, GatewayResult,
    RepoHandle, RepoLocator, RepositoryGateway, RetryPolicy, next_page_url,
};

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Maximum page size accepted by the GitHub API.
const MAX_PER_PAGE: u32 = 100;

/// Connection settings for [`GithubGateway`].
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// API base URL, without trailing slash.
    pub api_url: String,
    /// Page size for paginated listings.
    pub per_page: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Credentials, `None` for anonymous access.
    pub credentials: Option<Credentials>,
}

impl GatewaySettings {
    /// Creates settings for the given API base URL.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the page size (clamped to 1..=100).
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: MAX_PER_PAGE,
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::default(),
            credentials: None,
        }
    }
}

/// Repository payload.
#[derive(Debug, Deserialize)]
struct ApiRepository {
    id: u64,
    name: String,
    full_name: String,
    owner: ApiOwner,
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

/// Linked platform account of a commit author or committer.
#[derive(Debug, Default, Deserialize)]
struct ApiAccount {
    #[serde(default)]
    login: Option<String>,
}

/// Commit payload.
#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    #[serde(default)]
    url: String,
    commit: ApiGitCommit,
    #[serde(default)]
    author: Option<ApiAccount>,
    #[serde(default)]
    committer: Option<ApiAccount>,
    #[serde(default)]
    parents: Vec<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct ApiGitCommit {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<ApiSignature>,
    #[serde(default)]
    committer: Option<ApiSignature>,
}

#[derive(Debug, Deserialize)]
struct ApiSignature {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

impl From<ApiRepository> for RepoHandle {
    fn from(repo: ApiRepository) -> Self {
        Self {
            id: repo.id,
            owner: repo.owner.login,
            name: repo.name,
            full_name: repo.full_name,
            default_branch: repo.default_branch.unwrap_or_else(|| "master".to_string()),
        }
    }
}

impl From<ApiCommit> for CommitDetail {
    fn from(api: ApiCommit) -> Self {
        let timestamp = api
            .commit
            .committer
            .as_ref()
            .and_then(|s| s.date)
            .or_else(|| api.commit.author.as_ref().and_then(|s| s.date))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Self {
            sha: api.sha,
            parents: api.parents.into_iter().map(|p| p.sha).collect(),
            author_login: api.author.and_then(|a| a.login),
            author_name: api.commit.author.and_then(|s| s.name),
            committer_login: api.committer.and_then(|c| c.login),
            committer_name: api.commit.committer.and_then(|s| s.name),
            message: api.commit.message,
            url: api.url,
            timestamp,
        }
    }
}

/// A fetched response body plus the URL of the next page, if any.
struct Page {
    body: String,
    next: Option<String>,
}

/// Blocking gateway over the GitHub REST API.
///
/// One client is built per gateway and reused for every call.
pub struct GithubGateway {
    client: Client,
    settings: GatewaySettings,
}

impl GithubGateway {
    /// Creates a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: GatewaySettings) -> GatewayResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(GatewayError::ClientBuild)?;

        Ok(Self { client, settings })
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.api_url)
    }

    /// Performs a single GET, without retry.
    fn fetch_once(&self, url: &str) -> GatewayResult<Page> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.settings.credentials {
            Some(credentials) if credentials.username.is_empty() => {
                request = request.bearer_auth(credentials.secret());
            }
            Some(credentials) => {
                request = request.basic_auth(&credentials.username, Some(credentials.secret()));
            }
            None => {}
        }

        let http_error = |source| GatewayError::Http {
            url: url.to_string(),
            source,
        };

        let response = request.send().map_err(http_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().map_err(http_error)?;

        check_status(url, status, &headers, &body)?;

        let next = headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_url);

        Ok(Page { body, next })
    }

    /// Fetches and decodes one page, retrying transient failures.
    fn get_page<T: DeserializeOwned>(&self, url: &str) -> GatewayResult<(T, Option<String>)> {
        self.settings.retry.run(url, || {
            debug!(%url, "GET");
            let page = self.fetch_once(url)?;
            let value = serde_json::from_str(&page.body).map_err(|source| GatewayError::Decode {
                url: url.to_string(),
                source,
            })?;
            Ok((value, page.next))
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> GatewayResult<T> {
        self.get_page(url).map(|(value, _)| value)
    }

    /// Fetches every page of a listing.
    fn get_all<T: DeserializeOwned>(&self, first: String) -> GatewayResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next {
            let (page, following): (Vec<T>, _) = self.get_page(&url)?;
            items.extend(page);
            next = following;
        }
        Ok(items)
    }
}

impl RepositoryGateway for GithubGateway {
    fn get_repository(&self, locator: &RepoLocator) -> GatewayResult<RepoHandle> {
        let url = match locator {
            RepoLocator::Slug { owner, name } => self.url(&format!("/repos/{owner}/{name}")),
            RepoLocator::Id(id) => self.url(&format!("/repositories/{id}")),
        };
        self.get_json::<ApiRepository>(&url).map(RepoHandle::from)
    }

    fn list_commits(&self, repo: &RepoHandle, limit: usize) -> GatewayResult<Vec<CommitRef>> {
        let per_page = u32::try_from(limit)
            .unwrap_or(MAX_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let url = self.url(&format!(
            "/repos/{}/commits?per_page={per_page}",
            repo.full_name
        ));
        let mut commits: Vec<CommitRef> = self.get_json(&url)?;
        commits.truncate(limit);
        Ok(commits)
    }

    fn get_commit(&self, repo: &RepoHandle, sha: &str) -> GatewayResult<CommitDetail> {
        let url = self.url(&format!("/repos/{}/commits/{sha}", repo.full_name));
        self.get_json::<ApiCommit>(&url).map(CommitDetail::from)
    }

    fn list_forks(&self, repo: &RepoHandle) -> GatewayResult<Vec<RepoHandle>> {
        let url = self.url(&format!(
            "/repos/{}/forks?per_page={}",
            repo.full_name, self.settings.per_page
        ));
        let forks: Vec<ApiRepository> = self.get_all(url)?;
        Ok(forks.into_iter().map(RepoHandle::from).collect())
    }

    fn list_branches(&self, repo: &RepoHandle) -> GatewayResult<BranchListing> {
        let url = self.url(&format!(
            "/repos/{}/branches?per_page={}",
            repo.full_name, self.settings.per_page
        ));
        let values: Vec<serde_json::Value> = self.get_all(url)?;
        Ok(BranchListing::from_values(values))
    }

    fn fetch_committer_name(&self, commit_url: &str) -> GatewayResult<Option<String>> {
        let value: serde_json::Value = self.get_json(commit_url)?;
        Ok(committer_name_from(&value))
    }
}

/// Extracts `commit.committer.name` from a raw commit payload.
fn committer_name_from(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/commit/committer/name")
        .and_then(serde_json::Value::as_str)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Maps a non-success status to a gateway error.
fn check_status(url: &str, status: StatusCode, headers: &HeaderMap, body: &str) -> GatewayResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let rate_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    // Secondary rate limits answer 403 with `retry-after` and remaining quota.
    let retry_after = headers.contains_key(RETRY_AFTER);

    let url = url.to_string();
    Err(match status.as_u16() {
        404 => GatewayError::NotFound { url },
        429 => GatewayError::RateLimited { url },
        403 if rate_exhausted || retry_after => GatewayError::RateLimited { url },
        code => GatewayError::Status {
            url,
            status: code,
            message: api_message(body),
        },
    })
}

/// Returns the `message` field of an API error body, or the body itself.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
