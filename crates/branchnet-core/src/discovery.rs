//! Fork and branch discovery.

use std::collections::HashMap;

use branchnet_commit::BranchSeed;
use branchnet_github::{BranchEntry, GatewayError, RepoHandle, RepositoryGateway};
use tracing::{debug, info, warn};

use crate::{CoreError, CoreResult};

/// A fork and the branches found on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkNode {
    /// Owner login of the fork.
    pub owner: String,
    /// The fork repository.
    pub repository: RepoHandle,
    /// Well-formed branches of the fork, in listing order.
    pub branches: Vec<BranchEntry>,
}

/// Branch seeds keyed by branch name, in first-seen order.
///
/// Inserting a name that is already present replaces its tip but keeps
/// its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSet {
    seeds: Vec<BranchSeed>,
    index: HashMap<String, usize>,
}

impl SeedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a seed. Returns false if an existing tip was replaced.
    pub fn insert(&mut self, seed: BranchSeed) -> bool {
        if let Some(&position) = self.index.get(&seed.branch) {
            self.seeds[position] = seed;
            return false;
        }
        self.index.insert(seed.branch.clone(), self.seeds.len());
        self.seeds.push(seed);
        true
    }

    /// Number of seeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Returns true if there is no seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Iterates over the seeds in order.
    pub fn iter(&self) -> std::slice::Iter<'_, BranchSeed> {
        self.seeds.iter()
    }
}

impl<'a> IntoIterator for &'a SeedSet {
    type Item = &'a BranchSeed;
    type IntoIter = std::slice::Iter<'a, BranchSeed>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSeeds {
    /// The root repository's default-branch tip.
    pub root: BranchSeed,
    /// Branches of every fork, merged by name.
    pub fork_branches: SeedSet,
    /// Every fork found, in pre-order.
    pub forks: Vec<ForkNode>,
}

impl DiscoveredSeeds {
    /// All seeds in processing order, root seed first.
    pub fn seeds(&self) -> impl Iterator<Item = &BranchSeed> {
        std::iter::once(&self.root).chain(self.fork_branches.iter())
    }

    /// Number of seeds, root seed included.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.fork_branches.len()
    }

    /// Always false: the root seed is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Walks the fork tree of a repository.
pub struct ForkDiscovery<'g, G: ?Sized> {
    gateway: &'g G,
}

impl<'g, G: RepositoryGateway + ?Sized> ForkDiscovery<'g, G> {
    /// Creates a discovery over the given gateway.
    #[must_use]
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Lists the forks of `repo` recursively, in pre-order, with their branches.
    ///
    /// A recoverable failure on one fork skips that part of the tree.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-recoverable gateway failure.
    pub fn forks(&self, repo: &RepoHandle) -> CoreResult<Vec<ForkNode>> {
        let mut nodes = Vec::new();
        let mut stack = self.direct_forks(repo)?;
        stack.reverse();

        while let Some(fork) = stack.pop() {
            info!(fork = %fork.full_name, "listing fork branches");
            let branches = self.branches_of(&fork)?;
            let mut children = self.direct_forks(&fork)?;
            children.reverse();
            stack.extend(children);

            nodes.push(ForkNode {
                owner: fork.owner.clone(),
                repository: fork,
                branches,
            });
        }

        Ok(nodes)
    }

    /// Collects every traversal seed of `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyRepository`] if the default branch has no
    /// commit, or an error on a non-recoverable gateway failure.
    pub fn seeds(&self, repo: &RepoHandle) -> CoreResult<DiscoveredSeeds> {
        let tip = self
            .gateway
            .list_commits(repo, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::EmptyRepository(repo.full_name.clone()))?;
        let root = BranchSeed::new(repo.default_branch.clone(), tip.sha);
        debug!(seed = %root, "default branch tip");

        let forks = self.forks(repo)?;
        let mut fork_branches = SeedSet::new();
        for node in &forks {
            for branch in &node.branches {
                if !fork_branches.insert(BranchSeed::new(&branch.name, &branch.tip)) {
                    debug!(
                        fork = %node.repository.full_name,
                        branch = %branch.name,
                        "branch name seen before, tip replaced"
                    );
                }
            }
        }

        info!(
            repository = %repo.full_name,
            forks = forks.len(),
            seeds = fork_branches.len() + 1,
            "discovery complete"
        );

        Ok(DiscoveredSeeds {
            root,
            fork_branches,
            forks,
        })
    }

    fn direct_forks(&self, repo: &RepoHandle) -> CoreResult<Vec<RepoHandle>> {
        match self.gateway.list_forks(repo) {
            Ok(forks) => Ok(forks),
            Err(err) => skip_fork_failure(err, &repo.full_name, "fork listing skipped"),
        }
    }

    fn branches_of(&self, fork: &RepoHandle) -> CoreResult<Vec<BranchEntry>> {
        let listing = match self.gateway.list_branches(fork) {
            Ok(listing) => listing,
            Err(err) => return skip_fork_failure(err, &fork.full_name, "branch listing skipped"),
        };

        for raw in &listing.malformed {
            warn!(fork = %fork.full_name, entry = %raw, "malformed branch entry skipped");
        }
        for branch in &listing.branches {
            debug!(fork = %fork.full_name, branch = %branch.name, tip = %branch.tip, "branch");
        }

        Ok(listing.branches)
    }
}

/// Skips one fork's listing when the failure is local to that fork.
///
/// A fork refused with 403 or 451 is skipped; bad credentials still abort.
fn skip_fork_failure<T: Default>(
    err: GatewayError,
    repository: &str,
    message: &str,
) -> CoreResult<T> {
    if err.is_recoverable() || err.is_access_denied() {
        warn!(%repository, error = %err, "{message}");
        Ok(T::default())
    } else {
        Err(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchnet_github::{BranchListing, InMemoryGateway, InjectedFailure};

    fn root() -> RepoHandle {
        RepoHandle::new(1, "root", "project")
    }

    fn fork(id: u64, owner: &str) -> RepoHandle {
        RepoHandle::new(id, owner, "project")
    }

    fn network() -> InMemoryGateway {
        InMemoryGateway::new()
            .with_repository(root())
            .with_history("root/project", &["m3", "m2", "m1"])
            .with_fork("root/project", fork(2, "alice"))
            .with_fork("alice/project", fork(3, "carol"))
            .with_fork("root/project", fork(4, "bob"))
            .with_branches("alice/project", vec![BranchEntry::new("feature", "a1")])
            .with_branches("carol/project", vec![BranchEntry::new("fix", "c1")])
            .with_branches(
                "bob/project",
                vec![
                    BranchEntry::new("master", "b2"),
                    BranchEntry::new("feature", "b1"),
                ],
            )
    }

    #[test]
    fn test_seed_set_keeps_first_position() {
        let mut set = SeedSet::new();
        assert!(set.insert(BranchSeed::new("feature", "a1")));
        assert!(set.insert(BranchSeed::new("fix", "c1")));
        assert!(!set.insert(BranchSeed::new("feature", "b1")));

        let seeds: Vec<_> = set.iter().map(ToString::to_string).collect();
        assert_eq!(seeds, vec!["feature@b1", "fix@c1"]);
    }

    #[test]
    fn test_forks_pre_order() {
        let gateway = network();
        let forks = ForkDiscovery::new(&gateway).forks(&root()).unwrap();
        let owners: Vec<_> = forks.iter().map(|f| f.owner.as_str()).collect();
        assert_eq!(owners, vec!["alice", "carol", "bob"]);
        assert_eq!(forks[1].branches, vec![BranchEntry::new("fix", "c1")]);
    }

    #[test]
    fn test_seeds_root_first_then_merged_fork_branches() {
        let gateway = network();
        let discovered = ForkDiscovery::new(&gateway).seeds(&root()).unwrap();

        let seeds: Vec<_> = discovered
            .seeds()
            .map(|s| (s.branch.as_str(), s.tip.as_str()))
            .collect();
        assert_eq!(
            seeds,
            vec![
                ("master", "m3"),
                ("feature", "b1"),
                ("fix", "c1"),
                ("master", "b2"),
            ]
        );
        assert_eq!(discovered.len(), 4);
        assert_eq!(discovered.forks.len(), 3);
    }

    #[test]
    fn test_root_seed_uses_default_branch_name() {
        let repo = root().with_default_branch("main");
        let gateway = InMemoryGateway::new()
            .with_repository(repo.clone())
            .with_history("root/project", &["t1"]);
        let discovered = ForkDiscovery::new(&gateway).seeds(&repo).unwrap();
        assert_eq!(discovered.root, BranchSeed::new("main", "t1"));
        assert!(discovered.fork_branches.is_empty());
    }

    #[test]
    fn test_empty_repository() {
        let gateway = InMemoryGateway::new().with_repository(root());
        let err = ForkDiscovery::new(&gateway).seeds(&root()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyRepository(name) if name == "root/project"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let listing = BranchListing {
            branches: vec![BranchEntry::new("ok", "t1")],
            malformed: vec![r#"{"name":"broken"}"#.to_string()],
        };
        let gateway = InMemoryGateway::new()
            .with_fork("root/project", fork(2, "alice"))
            .with_branches("alice/project", listing);

        let forks = ForkDiscovery::new(&gateway).forks(&root()).unwrap();
        assert_eq!(forks[0].branches, vec![BranchEntry::new("ok", "t1")]);
    }

    #[test]
    fn test_recoverable_branch_failure_skips_fork_branches_only() {
        let gateway = network().fail_branches("alice/project", InjectedFailure::Unavailable);
        let forks = ForkDiscovery::new(&gateway).forks(&root()).unwrap();

        assert_eq!(forks.len(), 3);
        assert!(forks[0].branches.is_empty());
        assert_eq!(forks[1].owner, "carol");
    }

    #[test]
    fn test_blocked_fork_does_not_hide_other_forks() {
        let gateway = network().fail_branches("alice/project", InjectedFailure::Blocked);
        let discovered = ForkDiscovery::new(&gateway).seeds(&root()).unwrap();

        let seeds: Vec<_> = discovered
            .seeds()
            .map(|s| (s.branch.as_str(), s.tip.as_str()))
            .collect();
        assert_eq!(
            seeds,
            vec![
                ("master", "m3"),
                ("fix", "c1"),
                ("master", "b2"),
                ("feature", "b1"),
            ]
        );
        assert!(discovered.forks[0].branches.is_empty());
    }

    #[test]
    fn test_forbidden_fork_is_skipped() {
        let gateway = network().fail_branches("carol/project", InjectedFailure::Forbidden);
        let forks = ForkDiscovery::new(&gateway).forks(&root()).unwrap();

        assert_eq!(forks.len(), 3);
        assert!(forks[1].branches.is_empty());
        assert_eq!(forks[2].branches.len(), 2);
    }

    #[test]
    fn test_fatal_branch_failure_aborts() {
        let gateway = network().fail_branches("carol/project", InjectedFailure::Unauthorized);
        let err = ForkDiscovery::new(&gateway).forks(&root()).unwrap_err();
        assert!(matches!(err, CoreError::Gateway(_)));
    }
}
