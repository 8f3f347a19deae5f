//! Insertion-ordered commit map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::CommitRecord;

/// Deduplicated map of commit records, keyed by commit id.
///
/// Iteration follows insertion order. The first record inserted for an id
/// wins: later inserts for the same id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CommitRecord>", into = "Vec<CommitRecord>")]
pub struct CommitMap {
    records: Vec<CommitRecord>,
    index: HashMap<String, usize>,
}

impl CommitMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record unless its id is already present.
    ///
    /// Returns `true` if the record was inserted.
    pub fn insert(&mut self, record: CommitRecord) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Returns true if a record exists for the given id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the record for the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CommitRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Returns the number of recorded commits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no commit is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommitRecord> {
        self.records.iter()
    }

    /// Iterates over commit ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    /// Returns the total number of parent links across all records.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.records.iter().map(|r| r.parents.len()).sum()
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}

impl From<Vec<CommitRecord>> for CommitMap {
    fn from(records: Vec<CommitRecord>) -> Self {
        let mut map = Self::new();
        for record in records {
            map.insert(record);
        }
        map
    }
}

impl From<CommitMap> for Vec<CommitRecord> {
    fn from(map: CommitMap) -> Self {
        map.records
    }
}

impl<'a> IntoIterator for &'a CommitMap {
    type Item = &'a CommitRecord;
    type IntoIter = std::slice::Iter<'a, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, branch: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord::new(
            id,
            branch,
            "tester",
            Utc::now(),
            parents.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = CommitMap::new();
        assert!(map.insert(record("c1", "master", &[])));

        assert!(map.contains("c1"));
        assert_eq!(map.get("c1").unwrap().branch, "master");
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_first_writer_wins() {
        let mut map = CommitMap::new();
        assert!(map.insert(record("c1", "master", &[])));
        assert!(!map.insert(record("c1", "feature", &[])));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("c1").unwrap().branch, "master");
    }

    #[test]
    fn test_insertion_order() {
        let mut map = CommitMap::new();
        map.insert(record("c3", "master", &["c2"]));
        map.insert(record("c2", "master", &["c1"]));
        map.insert(record("c1", "master", &[]));

        let ids: Vec<_> = map.ids().collect();
        assert_eq!(ids, vec!["c3", "c2", "c1"]);
    }

    #[test]
    fn test_edge_count() {
        let mut map = CommitMap::new();
        map.insert(record("m", "master", &["a", "b"]));
        map.insert(record("a", "master", &["r"]));
        map.insert(record("b", "master", &["r"]));
        map.insert(record("r", "master", &[]));

        assert_eq!(map.edge_count(), 4);
    }

    #[test]
    fn test_clear() {
        let mut map = CommitMap::new();
        map.insert(record("c1", "master", &[]));
        map.clear();

        assert!(map.is_empty());
        assert!(!map.contains("c1"));
        assert!(map.insert(record("c1", "feature", &[])));
    }

    #[test]
    fn test_get_missing() {
        let map = CommitMap::new();
        assert!(map.get("nope").is_none());
    }

    #[test]
    fn test_serde_keeps_order() {
        let mut map = CommitMap::new();
        map.insert(record("b", "master", &["a"]));
        map.insert(record("a", "master", &[]));

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with('['));

        let restored: CommitMap = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, map);
        assert_eq!(restored.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_from_vec_drops_duplicates() {
        let map = CommitMap::from(vec![
            record("a", "master", &[]),
            record("a", "feature", &[]),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").unwrap().branch, "master");
    }
}
