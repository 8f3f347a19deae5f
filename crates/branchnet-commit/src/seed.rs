//! Traversal seeds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A branch tip from which an ancestry traversal starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchSeed {
    /// The branch name.
    pub branch: String,

    /// The hash of the branch's tip commit.
    pub tip: String,
}

impl BranchSeed {
    /// Creates a new seed.
    #[must_use]
    pub fn new(branch: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            tip: tip.into(),
        }
    }
}

impl fmt::Display for BranchSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.branch, crate::record::short(&self.tip))
    }
}
