//! Committer identity resolution.

use branchnet_commit::UNKNOWN_COMMITTER;
use branchnet_github::{CommitDetail, RepositoryGateway};
use tracing::warn;

/// Where a committer identity can come from, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Platform account linked to the committer.
    CommitterLogin,
    /// Platform account linked to the author.
    AuthorLogin,
    /// Author name written in the commit.
    AuthorName,
    /// Committer name written in the commit, fetched from the commit URL
    /// when the payload lacks it.
    RawCommitter,
}

impl IdentitySource {
    /// Sources tried in order; the first one yielding a name wins.
    pub const ORDER: [Self; 4] = [
        Self::CommitterLogin,
        Self::AuthorLogin,
        Self::AuthorName,
        Self::RawCommitter,
    ];

    fn lookup<G: RepositoryGateway + ?Sized>(
        self,
        gateway: &G,
        detail: &CommitDetail,
    ) -> Option<String> {
        let found = match self {
            Self::CommitterLogin => detail.committer_login.clone(),
            Self::AuthorLogin => detail.author_login.clone(),
            Self::AuthorName => detail.author_name.clone(),
            Self::RawCommitter => raw_committer(gateway, detail),
        };
        found.filter(|name| !name.trim().is_empty())
    }
}

fn raw_committer<G: RepositoryGateway + ?Sized>(
    gateway: &G,
    detail: &CommitDetail,
) -> Option<String> {
    if let Some(name) = detail
        .committer_name
        .as_ref()
        .filter(|name| !name.trim().is_empty())
    {
        return Some(name.clone());
    }
    if detail.url.is_empty() {
        return None;
    }
    gateway
        .fetch_committer_name(&detail.url)
        .inspect_err(|err| {
            warn!(sha = %detail.sha, error = %err, "committer lookup failed");
        })
        .ok()
        .flatten()
}

/// Resolves the committer identity of a commit.
///
/// Returns the identity and its source, or [`UNKNOWN_COMMITTER`] and `None`
/// when every source came up empty.
pub fn resolve_committer<G: RepositoryGateway + ?Sized>(
    gateway: &G,
    detail: &CommitDetail,
) -> (String, Option<IdentitySource>) {
    IdentitySource::ORDER
        .into_iter()
        .find_map(|source| source.lookup(gateway, detail).map(|name| (name, Some(source))))
        .unwrap_or_else(|| (UNKNOWN_COMMITTER.to_string(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchnet_github::{InMemoryGateway, InjectedFailure};

    #[test]
    fn test_committer_login_first() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[])
            .with_committer_login("web-flow")
            .with_author_login("ada");
        assert_eq!(
            resolve_committer(&gateway, &detail),
            ("web-flow".to_string(), Some(IdentitySource::CommitterLogin))
        );
    }

    #[test]
    fn test_author_login_when_committer_unlinked() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[])
            .with_author_login("ada")
            .with_author_name("Ada Lovelace");
        assert_eq!(
            resolve_committer(&gateway, &detail).1,
            Some(IdentitySource::AuthorLogin)
        );
    }

    #[test]
    fn test_author_name_when_no_account() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[]).with_author_name("Ada Lovelace");
        assert_eq!(resolve_committer(&gateway, &detail).0, "Ada Lovelace");
        assert_eq!(gateway.raw_fetches(), 0);
    }

    #[test]
    fn test_raw_fetch_fallback() {
        let gateway = InMemoryGateway::new().with_raw_committer("memory://c1", "Jane Doe");
        let detail = CommitDetail::new("c1", &[]).with_url("memory://c1");
        assert_eq!(
            resolve_committer(&gateway, &detail),
            ("Jane Doe".to_string(), Some(IdentitySource::RawCommitter))
        );
        assert_eq!(gateway.raw_fetches(), 1);
    }

    #[test]
    fn test_committer_name_in_payload_skips_raw_fetch() {
        let gateway = InMemoryGateway::new().with_raw_committer("memory://c1", "Other");
        let detail = CommitDetail::new("c1", &[])
            .with_committer_name("Jane Doe")
            .with_url("memory://c1");
        assert_eq!(
            resolve_committer(&gateway, &detail),
            ("Jane Doe".to_string(), Some(IdentitySource::RawCommitter))
        );
        assert_eq!(gateway.raw_fetches(), 0);
    }

    #[test]
    fn test_placeholder_when_everything_missing() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[]).with_url("memory://c1");
        assert_eq!(
            resolve_committer(&gateway, &detail),
            (UNKNOWN_COMMITTER.to_string(), None)
        );
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[])
            .with_committer_login("")
            .with_author_name("  ")
            .with_author_login("ada");
        assert_eq!(resolve_committer(&gateway, &detail).0, "ada");
    }

    #[test]
    fn test_no_raw_fetch_without_url() {
        let gateway = InMemoryGateway::new();
        let detail = CommitDetail::new("c1", &[]);
        assert_eq!(resolve_committer(&gateway, &detail).0, UNKNOWN_COMMITTER);
        assert_eq!(gateway.raw_fetches(), 0);
    }

    #[test]
    fn test_raw_fetch_failure_falls_back_to_placeholder() {
        let gateway = InMemoryGateway::new()
            .with_raw_committer("memory://c1", "Jane Doe")
            .fail_raw_committer("memory://c1", InjectedFailure::Unavailable);
        let detail = CommitDetail::new("c1", &[]).with_url("memory://c1");
        assert_eq!(resolve_committer(&gateway, &detail).0, UNKNOWN_COMMITTER);
    }
}
