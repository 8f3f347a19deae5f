//! Exporter trait and file output.

use std::path::{Path, PathBuf};

use branchnet_commit::CommitMap;
use tracing::info;

use crate::{ExportError, ExportResult};

/// Serializes a commit map into a document.
pub trait CommitExporter {
    /// Exporter name, used in logs.
    fn name(&self) -> &'static str;

    /// File extension of the output, without the dot.
    fn extension(&self) -> &'static str;

    /// Renders the whole map, entries in insertion order.
    fn render(&self, commits: &CommitMap) -> String;
}

/// Returns `<dir>/<repo_name>commit_structure.<extension>`.
#[must_use]
pub fn output_path(dir: &Path, repo_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{repo_name}commit_structure.{extension}"))
}

/// Writes one file per exporter into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be written.
pub fn export_all(
    commits: &CommitMap,
    dir: &Path,
    repo_name: &str,
    exporters: &[&dyn CommitExporter],
) -> ExportResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(exporters.len());
    for exporter in exporters {
        let path = output_path(dir, repo_name, exporter.extension());
        std::fs::write(&path, exporter.render(commits)).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            exporter = exporter.name(),
            path = %path.display(),
            commits = commits.len(),
            "export written"
        );
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvExporter, GraphmlExporter};
    use branchnet_commit::CommitRecord;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_map() -> CommitMap {
        let date = Utc.with_ymd_and_hms(2017, 3, 9, 0, 0, 0).unwrap();
        let mut map = CommitMap::new();
        map.insert(CommitRecord::new("c2", "master", "ada", date, vec!["c1".into()]));
        map.insert(CommitRecord::new("c1", "master", "ada", date, vec![]));
        map
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("Results"), "animaluni", "csv"),
            PathBuf::from("Results/animalunicommit_structure.csv")
        );
    }

    #[test]
    fn test_export_all_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("Results");
        let csv = CsvExporter::new();
        let graphml = GraphmlExporter::new(Some(1));

        let written = export_all(&sample_map(), &dir, "repo", &[&csv, &graphml]).unwrap();

        assert_eq!(
            written,
            vec![
                dir.join("repocommit_structure.csv"),
                dir.join("repocommit_structure.graphml"),
            ]
        );
        let csv_text = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(csv_text.lines().count(), 2);
        assert!(written[1].is_file());
    }

    #[test]
    fn test_export_all_fails_on_file_as_directory() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("Results");
        std::fs::write(&blocker, "").unwrap();

        let err = export_all(&sample_map(), &blocker, "repo", &[&CsvExporter::new()]).unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));
    }
}
