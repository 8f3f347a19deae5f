//! Core library for branchnet.
//!
//! This crate provides the mining logic: fork and branch discovery, the
//! commit ancestry traversal, committer identity resolution, checkpoints
//! and batch input handling.

mod batch;
mod builder;
mod checkpoint;
mod discovery;
mod error;
mod identity;
mod miner;

pub use batch::{
    BatchEntry, BatchInput, ResolvedRepository, SkippedLine, parse_batch, render_resolved,
    resolve_ids,
};
pub use builder::{CommitGraphBuilder, Deadline, TraversalStats};
pub use checkpoint::{CheckpointStore, checkpoint_path};
pub use discovery::{DiscoveredSeeds, ForkDiscovery, ForkNode, SeedSet};
pub use error::{CoreError, CoreResult};
pub use identity::{IdentitySource, resolve_committer};
pub use miner::{BatchReport, Miner, MinerOptions, MiningReport};
