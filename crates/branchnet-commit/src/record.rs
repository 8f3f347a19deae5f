//! Commit record type as stored in the ancestry graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used when no committer identity could be resolved.
pub const UNKNOWN_COMMITTER: &str = "none";

/// A commit as recorded in the ancestry graph.
///
/// Records are created on the first visit of a commit and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit hash (SHA).
    pub id: String,

    /// The branch through which this commit was first discovered.
    pub branch: String,

    /// The resolved committer identity.
    pub committer: String,

    /// The full commit message.
    pub message: String,

    /// The API URL of the commit.
    pub url: String,

    /// The committer date.
    pub timestamp: DateTime<Utc>,

    /// Parent commit hashes, in parent order.
    pub parents: Vec<String>,
}

impl CommitRecord {
    /// Creates a new commit record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        branch: impl Into<String>,
        committer: impl Into<String>,
        timestamp: DateTime<Utc>,
        parents: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            branch: branch.into(),
            committer: committer.into(),
            message: String::new(),
            url: String::new(),
            timestamp,
            parents,
        }
    }

    /// Sets the commit message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the commit URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns the short id (first 7 characters).
    #[must_use]
    pub fn short_id(&self) -> &str {
        short(&self.id)
    }

    /// Returns true if this is a root commit (no parents).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if this commit has more than one parent.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Returns the committer date formatted as `DD-MM-YYYY`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.timestamp.format("%d-%m-%Y").to_string()
    }

    /// Returns the parent ids joined by `", "`.
    #[must_use]
    pub fn flattened_parents(&self) -> String {
        self.parents.join(", ")
    }
}

/// Returns the first 7 characters of a commit id.
#[must_use]
pub fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_record(id: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord::new(
            id,
            "master",
            "octocat",
            Utc.with_ymd_and_hms(2017, 3, 9, 14, 30, 0).unwrap(),
            parents.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn test_new() {
        let record = make_record("abc1234567890", &["def"]);

        assert_eq!(record.id, "abc1234567890");
        assert_eq!(record.branch, "master");
        assert_eq!(record.committer, "octocat");
        assert!(record.message.is_empty());
        assert_eq!(record.parents, vec!["def".to_string()]);
    }

    #[test]
    fn test_with_message_and_url() {
        let record = make_record("abc", &[])
            .with_message("Initial commit")
            .with_url("https://api.github.com/repos/o/r/commits/abc");

        assert_eq!(record.message, "Initial commit");
        assert!(record.url.ends_with("/commits/abc"));
    }

    #[test]
    fn test_short_id() {
        let record = make_record("abc1234567890", &[]);
        assert_eq!(record.short_id(), "abc1234");
    }

    #[test]
    fn test_short_id_less_than_7() {
        let record = make_record("abc", &[]);
        assert_eq!(record.short_id(), "abc");
    }

    #[test]
    fn test_short_id_empty() {
        let record = make_record("", &[]);
        assert_eq!(record.short_id(), "");
    }

    #[test]
    fn test_root_and_merge() {
        assert!(make_record("a", &[]).is_root());
        assert!(!make_record("a", &["b"]).is_root());
        assert!(!make_record("a", &["b"]).is_merge());
        assert!(make_record("a", &["b", "c"]).is_merge());
    }

    #[test]
    fn test_display_date() {
        let record = make_record("a", &[]);
        assert_eq!(record.display_date(), "09-03-2017");
    }

    #[test]
    fn test_flattened_parents() {
        assert_eq!(make_record("a", &[]).flattened_parents(), "");
        assert_eq!(make_record("a", &["b"]).flattened_parents(), "b");
        assert_eq!(make_record("a", &["b", "c"]).flattened_parents(), "b, c");
    }

    #[test]
    fn test_serialize_deserialize() {
        let record = make_record("abc123", &["p1", "p2"]).with_message("msg");
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: CommitRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
