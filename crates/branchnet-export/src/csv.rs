//! CSV table export.

use branchnet_commit::{CommitMap, CommitRecord};

use crate::CommitExporter;

/// Writes one row per commit, without header:
/// `id,branch,committer,DD-MM-YYYY,parents`.
///
/// Fields are quoted as in RFC 4180 and rows end with CRLF.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Creates a new exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_row(out: &mut String, record: &CommitRecord) {
        let fields = [
            record.id.clone(),
            record.branch.clone(),
            record.committer.clone(),
            record.display_date(),
            record.flattened_parents(),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(out, field);
        }
        out.push_str("\r\n");
    }
}

impl CommitExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, commits: &CommitMap) -> String {
        let mut out = String::new();
        for record in commits {
            Self::write_row(&mut out, record);
        }
        out
    }
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
