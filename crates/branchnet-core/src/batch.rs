//! Batch input files.
//!
//! A batch file lists one repository per line as `owner,name`.

use std::fmt;

use branchnet_github::{RepoLocator, RepositoryGateway};
use tracing::{info, warn};

use crate::CoreResult;

/// A repository listed in a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl BatchEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Locator of the listed repository.
    #[must_use]
    pub fn locator(&self) -> RepoLocator {
        RepoLocator::slug(&self.owner, &self.name)
    }
}

impl fmt::Display for BatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A line that could not be read as `owner,name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Raw line content.
    pub content: String,
}

/// Parsed batch file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchInput {
    /// Valid entries, in file order.
    pub entries: Vec<BatchEntry>,
    /// Malformed lines.
    pub skipped: Vec<SkippedLine>,
}

/// Parses a batch file.
///
/// Blank lines are ignored. Lines without exactly two non-empty
/// comma-separated fields are skipped with a warning.
#[must_use]
pub fn parse_batch(input: &str) -> BatchInput {
    let mut batch = BatchInput::default();
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    for (index, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(unquote).collect();
        match fields.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                batch.entries.push(BatchEntry::new(*owner, *name));
            }
            _ => {
                warn!(
                    line = index + 1,
                    content = %line,
                    "wrong line format, expected 'owner,repository', line ignored"
                );
                batch.skipped.push(SkippedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    batch
}

/// Trims a field and removes one pair of surrounding double quotes.
fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or(field, str::trim)
}

/// A batch entry with its numeric repository id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepository {
    /// The listed repository.
    pub entry: BatchEntry,
    /// Numeric id on the platform.
    pub id: u64,
}

/// Looks up the numeric id of every entry.
///
/// Repositories that cannot be found are skipped with a warning.
///
/// # Errors
///
/// Returns an error on a non-recoverable gateway failure.
pub fn resolve_ids<G: RepositoryGateway + ?Sized>(
    gateway: &G,
    input: &BatchInput,
) -> CoreResult<Vec<ResolvedRepository>> {
    let mut resolved = Vec::with_capacity(input.entries.len());
    for entry in &input.entries {
        match gateway.get_repository(&entry.locator()) {
            Ok(repo) => {
                info!(repository = %entry, id = repo.id, "resolved");
                resolved.push(ResolvedRepository {
                    entry: entry.clone(),
                    id: repo.id,
                });
            }
            Err(err) if err.is_recoverable() => {
                warn!(repository = %entry, error = %err, "repository skipped");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(resolved)
}

/// Renders `owner,name,id` rows with CRLF line endings.
#[must_use]
pub fn render_resolved(rows: &[ResolvedRepository]) -> String {
    rows.iter()
        .map(|row| format!("{},{},{}\r\n", row.entry.owner, row.entry.name, row.id))
        .collect()
}
