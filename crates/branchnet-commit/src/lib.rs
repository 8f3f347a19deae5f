//! Commit graph data model for branchnet.
//!
//! This crate provides the types shared by the traversal engine and the exporters:
//! - [`CommitRecord`]: A commit as recorded in the ancestry graph
//! - [`BranchSeed`]: A branch tip that starts a traversal
//! - [`CommitMap`]: The insertion-ordered, deduplicated commit map

mod map;
mod record;
mod seed;

pub use map::CommitMap;
pub use record::{CommitRecord, UNKNOWN_COMMITTER, short};
pub use seed::BranchSeed;
