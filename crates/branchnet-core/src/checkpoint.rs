//! Traversal checkpoints.

use std::path::{Path, PathBuf};

use branchnet_commit::CommitMap;
use branchnet_export::output_path;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{CoreError, CoreResult};

/// Returns `<dir>/<repo_name>commit_structure.checkpoint.json`.
#[must_use]
pub fn checkpoint_path(dir: &Path, repo_name: &str) -> PathBuf {
    output_path(dir, repo_name, "checkpoint.json")
}

#[derive(Serialize)]
struct CheckpointRef<'a> {
    repository: &'a str,
    commits: &'a CommitMap,
}

#[derive(Deserialize)]
struct CheckpointFile {
    repository: String,
    commits: CommitMap,
}

/// Saves and restores the commit map of one repository.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    repository: String,
}

impl CheckpointStore {
    /// Creates a store for `repository` (full name) at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, repository: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repository: repository.into(),
        }
    }

    /// Path of the checkpoint file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the checkpoint, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, commits: &CommitMap) -> CoreResult<()> {
        let json = serde_json::to_string(&CheckpointRef {
            repository: &self.repository,
            commits,
        })
        .map_err(|source| self.format_error(source))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), commits = commits.len(), "checkpoint saved");
        Ok(())
    }

    /// Reads the checkpoint, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if it
    /// belongs to another repository.
    pub fn load(&self) -> CoreResult<Option<CommitMap>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let file: CheckpointFile =
            serde_json::from_str(&content).map_err(|source| self.format_error(source))?;
        if file.repository != self.repository {
            return Err(CoreError::CheckpointMismatch {
                path: self.path.clone(),
                expected: self.repository.clone(),
                found: file.repository,
            });
        }

        info!(
            path = %self.path.display(),
            commits = file.commits.len(),
            "checkpoint loaded"
        );
        Ok(Some(file.commits))
    }

    /// Deletes the checkpoint if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    pub fn remove(&self) -> CoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn format_error(&self, source: serde_json::Error) -> CoreError {
        CoreError::Checkpoint {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchnet_commit::CommitRecord;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> CommitMap {
        let date = Utc.with_ymd_and_hms(2017, 3, 9, 12, 0, 0).unwrap();
        let mut map = CommitMap::new();
        map.insert(
            CommitRecord::new("c2", "master", "ada", date, vec!["c1".into()])
                .with_message("Second"),
        );
        map.insert(CommitRecord::new("c1", "feature", "none", date, vec![]));
        map
    }

    #[test]
    fn test_checkpoint_path() {
        assert_eq!(
            checkpoint_path(Path::new("Results"), "animaluni"),
            PathBuf::from("Results/animalunicommit_structure.checkpoint.json")
        );
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let temp = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp.path().join("cp.json"), "o/r");

        store.save(&sample()).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, sample());
        assert_eq!(loaded.ids().collect::<Vec<_>>(), vec!["c2", "c1"]);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp.path().join("absent.json"), "o/r");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_rejects_other_repository() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cp.json");
        CheckpointStore::new(&path, "o/other").save(&sample()).unwrap();

        let err = CheckpointStore::new(&path, "o/r").load().unwrap_err();
        assert!(matches!(
            err,
            CoreError::CheckpointMismatch { found, .. } if found == "o/other"
        ));
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cp.json");
        std::fs::write(&path, "{\"repository\": ").unwrap();

        let err = CheckpointStore::new(&path, "o/r").load().unwrap_err();
        assert!(matches!(err, CoreError::Checkpoint { .. }));
    }

    #[test]
    fn test_save_creates_directory_and_remove() {
        let temp = TempDir::new().unwrap();
        let path = checkpoint_path(&temp.path().join("Results"), "r");
        let store = CheckpointStore::new(&path, "o/r");

        store.save(&sample()).unwrap();
        assert!(path.is_file());

        store.remove().unwrap();
        assert!(!path.exists());
        // Removing twice is fine.
        store.remove().unwrap();
    }
}
