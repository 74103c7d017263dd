//! # Bit — a local, content-addressed version-control engine
//!
//! Bit tracks the evolution of a working directory through immutable snapshots stored in a
//! `.bit/` directory, offering branching, three-way merging, a staging area (the index),
//! diffing, stashing, and resets. It is single-user and single-machine: there is no network
//! transport, no packed objects, and no cross-process locking.
//!
//! ## Architecture
//!
//! Every piece of history is an object identified by the hex SHA-1 of its raw payload bytes
//! (`store`). A **blob** is file contents; a **tree** is a sorted directory snapshot
//! (`objects::tree`); a **commit** chains onto its parents through a `tree` oid and zero or
//! more `parent` oids (`objects::commit`). **Refs** (`refs`) are named, mutable pointers onto
//! commit oids; `HEAD` is either attached to a branch or detached. The **index** (`index`) is
//! the flat `path -> oid` staging snapshot that the next commit will freeze into a tree
//! (`tree_builder`). The **worktree** adapter (`worktree`, `ignore`) is the only component that
//! touches files outside `.bit/`. The **diff** engine and **merge** engine sit on top of all of
//! this; **stash** is a pair of operations layered entirely on `merge`.
//!
//! This module is the repository façade: it owns `.bit`'s mutable resources (the index file,
//! refs, `HEAD`, `MERGE_HEAD`) and orchestrates the subsystems above into the operations a CLI
//! front-end calls — `add`, `rm`, `commit`, `status`, `log`, `branch`, `checkout`, `restore`,
//! `reset`, `merge`. Every other component holds no state beyond what is passed to it; the
//! façade is the only thing that knows where `.bit` lives.

pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod ignore;
pub mod index;
pub mod merge;
pub mod objects;
pub mod refs;
pub mod stash;
pub mod store;
pub mod tree_builder;
pub mod worktree;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diff::FileDiff;
use crate::error::{Error, Result};
use crate::ignore::IgnoreRules;
use crate::index::Index;
use crate::merge::MergeOutcome;
use crate::objects::commit::{Author, Commit};
use crate::refs::RefStore;
use crate::stash::StashEntry;
use crate::store::Store;
use crate::worktree::Worktree;

/// The name of the repository directory, analogous to `.git`.
pub const BIT_DIR: &str = ".bit";

/// A handle onto a repository rooted at `root`, with `.bit` living at `bit_dir`. The handle
/// carries its root path explicitly (rather than relying on the process's current directory)
/// so tests — and, in principle, multiple repositories in one process — can each point at
/// their own tree.
#[derive(Debug, Clone)]
pub struct Repository {
    pub root: PathBuf,
    pub bit_dir: PathBuf,
}

/// The three `reset` modes from §4.9: how far the reset reaches past the ref update itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Soft,
    Mixed,
    Hard,
}

/// The classification of one path in a status snapshot (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    New,
    Modified,
    Deleted,
}

/// A full (staged, unstaged, untracked) snapshot, as returned by `Repository::status`.
#[derive(Debug, Default, Clone)]
pub struct Status {
    pub staged: BTreeMap<String, StatusKind>,
    pub unstaged: BTreeMap<String, StatusKind>,
    pub untracked: Vec<String>,
}

impl Status {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

/// One entry in `Repository::log`'s first-parent chain.
pub struct LogEntry {
    pub oid: String,
    pub commit: Commit,
    pub current_branch: Option<String>,
    pub branches: Vec<String>,
}

/// The outcome of `Repository::merge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeResult {
    AlreadyUpToDate,
    FastForward(String),
    Merged(String),
}

impl Repository {
    /// Find the repository containing the current directory, walking up to the filesystem
    /// root.
    pub fn find() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::find_from(&cwd)
    }

    /// Find the repository containing `start`, walking up to the filesystem root.
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let bit_dir = current.join(BIT_DIR);
            if bit_dir.is_dir() {
                return Ok(Self { root: current, bit_dir });
            }
            if !current.pop() {
                return Err(Error::NotARepo(start.to_path_buf()));
            }
        }
    }

    /// Initialize a new repository at `path`. Fails with `AlreadyExists` if `.bit` is already
    /// present.
    pub fn init(path: &Path) -> Result<Self> {
        let root = path.to_path_buf();
        let bit_dir = root.join(BIT_DIR);
        if bit_dir.exists() {
            return Err(Error::AlreadyExists(format!("repository at {}", bit_dir.display())));
        }

        fs::create_dir_all(bit_dir.join("objects"))?;
        fs::create_dir_all(bit_dir.join("refs").join("heads"))?;
        fs::write(bit_dir.join("HEAD"), "ref: refs/heads/master\n")?;

        let repo = Self { root, bit_dir };
        Index::default().write(&repo.index_path())?;
        Ok(repo)
    }

    // ---- component accessors ----

    fn store(&self) -> Store {
        Store::new(self.bit_dir.join("objects"))
    }

    fn refs(&self) -> RefStore {
        RefStore::new(self.bit_dir.clone())
    }

    fn worktree(&self) -> Worktree {
        Worktree::new(self.root.clone())
    }

    fn index_path(&self) -> PathBuf {
        self.bit_dir.join("index")
    }

    fn load_index(&self) -> Result<Index> {
        Index::load(&self.index_path())
    }

    fn ignore_rules(&self) -> Result<IgnoreRules> {
        IgnoreRules::load(&self.root.join(".bitignore"))
    }

    fn head_oid(&self) -> Result<Option<String>> {
        self.refs().read_head()
    }

    fn head_tree_map(&self) -> Result<BTreeMap<String, String>> {
        tree_builder::walk_commit(&self.store(), self.head_oid()?.as_deref())
    }

    /// Resolve a branch name, `HEAD`, a `HEAD~N` first-parent ancestor reference, or a raw oid
    /// to a commit oid. Branch names take precedence; a string that isn't a known branch or
    /// `HEAD`-relative reference is assumed to already be an oid (the object store will raise
    /// `NotFound` later if it isn't).
    pub fn resolve_commit(&self, target: &str) -> Result<String> {
        let refs = self.refs();
        if let Some(oid) = refs.read_branch(target)? {
            return Ok(oid);
        }
        if target == "HEAD" {
            return self
                .head_oid()?
                .ok_or_else(|| Error::NotFound("HEAD has no commit yet".to_string()));
        }
        if let Some(n) = target.strip_prefix("HEAD~") {
            let steps: usize = n
                .parse()
                .map_err(|_| Error::NotFound(format!("invalid ref '{target}'")))?;
            let store = self.store();
            let mut current = self
                .head_oid()?
                .ok_or_else(|| Error::NotFound("HEAD has no commit yet".to_string()))?;
            for _ in 0..steps {
                current = tree_builder::read_commit(&store, &current)?
                    .parents
                    .first()
                    .cloned()
                    .ok_or_else(|| Error::NotFound(format!("'{target}' has no such ancestor")))?;
            }
            return Ok(current);
        }
        if self.store().exists(target) {
            return Ok(target.to_string());
        }
        Err(Error::NotFound(format!("ref or object '{target}'")))
    }

    // ---- staging ----

    /// Stage the given worktree paths. A path missing from the worktree is staged as a
    /// deletion if it is tracked in the index, or fails with `NotFound` otherwise. Returns the
    /// number of index entries that actually changed.
    pub fn add(&self, paths: &[String]) -> Result<usize> {
        let worktree = self.worktree();
        let store = self.store();
        let mut index = self.load_index()?;
        let mut changed = 0;

        for raw in paths {
            let path = worktree.normalize(raw)?;
            if worktree.exists(&path) {
                let content = worktree.read(&path)?;
                let oid = store.put(&content)?;
                if index.get(&path).map(String::as_str) != Some(oid.as_str()) {
                    changed += 1;
                }
                index.set(path, oid);
            } else if index.contains(&path) {
                index.remove(&path);
                changed += 1;
            } else {
                return Err(Error::NotFound(path));
            }
        }

        index.write(&self.index_path())?;
        Ok(changed)
    }

    /// Stage every worktree path plus every currently tracked path (so deletions are picked
    /// up too).
    pub fn add_all(&self) -> Result<usize> {
        let worktree = self.worktree();
        let ignore = self.ignore_rules()?;
        let index = self.load_index()?;

        let mut paths: BTreeSet<String> = worktree.list(&ignore)?.into_iter().collect();
        paths.extend(index.paths().cloned());
        let paths: Vec<String> = paths.into_iter().collect();

        self.add(&paths)
    }

    /// Unstage and delete a tracked path. Fails with `NotFound` if the path isn't in the
    /// index.
    pub fn rm(&self, raw_path: &str) -> Result<()> {
        let worktree = self.worktree();
        let path = worktree.normalize(raw_path)?;

        let mut index = self.load_index()?;
        if !index.contains(&path) {
            return Err(Error::NotFound(path));
        }
        index.remove(&path);
        index.write(&self.index_path())?;
        worktree.remove(&path)?;
        Ok(())
    }

    // ---- commit ----

    /// Read the author/committer identity from local-then-global config, falling back to
    /// environment variables and then a fixed default.
    fn author_identity(&self) -> Result<Author> {
        let (name, email) =
            config::author_identity(&self.bit_dir.join("config"), &config::global_config_path())?;
        Ok(Author::new(&name, &email))
    }

    /// Freeze the current index into a commit. Aborts with `NoChanges` if the resulting tree
    /// is identical to HEAD's (including the case of an entirely empty index, which has no
    /// representable tree at all — see `tree_builder::build`). Parents are HEAD's oid (if any)
    /// plus `MERGE_HEAD` (if a merge is in progress); `MERGE_HEAD` is removed once the commit
    /// is written.
    ///
    /// If the process is killed after the merge engine writes `MERGE_HEAD` but before this
    /// call runs, the in-progress-merge marker is left behind; re-running `commit` completes
    /// it normally, or it can be removed by hand to abandon the merge.
    pub fn commit(&self, message: &str) -> Result<String> {
        let store = self.store();
        let index = self.load_index()?;

        let head_oid = self.head_oid()?;
        let head_tree = match &head_oid {
            Some(oid) => Some(tree_builder::read_commit(&store, oid)?.tree),
            None => None,
        };

        let tree_oid = tree_builder::build(&store, &index.as_map())?;
        if tree_oid == head_tree {
            return Err(Error::NoChanges("nothing to commit".to_string()));
        }
        let tree = tree_oid.ok_or_else(|| Error::NoChanges("nothing to commit".to_string()))?;

        let mut parents = Vec::new();
        if let Some(oid) = &head_oid {
            parents.push(oid.clone());
        }
        let merge_head = self.refs().read_merge_head()?;
        if let Some(oid) = &merge_head {
            parents.push(oid.clone());
        }

        let author = self.author_identity()?;
        let commit = Commit::new(tree, parents, author.clone(), author, message.to_string());
        let oid = store.put(commit.serialize().as_bytes())?;

        match self.refs().current_branch()? {
            Some(branch) => self.refs().write_branch(&branch, &oid)?,
            None => self.refs().write_head_detached(&oid)?,
        }
        self.refs().clear_merge_head()?;
        Ok(oid)
    }

    // ---- status / diff ----

    /// Classify every path across HEAD, the index, and the worktree (§7).
    pub fn status(&self) -> Result<Status> {
        let head = self.head_tree_map()?;
        let index = self.load_index()?.as_map();
        let ignore = self.ignore_rules()?;
        let worktree = self.worktree();
        let worktree_files: BTreeMap<String, String> =
            worktree.list_with_hashes(&ignore)?.into_iter().collect();

        let mut staged = BTreeMap::new();
        let mut paths: BTreeSet<&String> = BTreeSet::new();
        paths.extend(head.keys());
        paths.extend(index.keys());
        for path in paths {
            let head_oid = head.get(path);
            let index_oid = index.get(path);
            match (head_oid, index_oid) {
                (None, Some(_)) => {
                    staged.insert(path.clone(), StatusKind::New);
                }
                (Some(_), None) => {
                    staged.insert(path.clone(), StatusKind::Deleted);
                }
                (Some(h), Some(i)) if h != i => {
                    staged.insert(path.clone(), StatusKind::Modified);
                }
                _ => {}
            }
        }

        let mut unstaged = BTreeMap::new();
        for (path, index_oid) in &index {
            match worktree_files.get(path) {
                Some(wt_oid) if wt_oid != index_oid => {
                    unstaged.insert(path.clone(), StatusKind::Modified);
                }
                None => {
                    unstaged.insert(path.clone(), StatusKind::Deleted);
                }
                _ => {}
            }
        }

        let untracked: Vec<String> = worktree_files
            .keys()
            .filter(|p| !index.contains_key(*p))
            .cloned()
            .collect();

        Ok(Status { staged, unstaged, untracked })
    }

    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.status()?.is_clean())
    }

    /// Index vs. worktree (unstaged changes).
    pub fn diff_unstaged(&self) -> Result<Vec<FileDiff>> {
        let store = self.store();
        let index = self.load_index()?.as_map();
        let ignore = self.ignore_rules()?;
        let worktree_files: BTreeMap<String, String> =
            self.worktree().list_with_hashes(&ignore)?.into_iter().collect();
        diff::index_vs_worktree(&store, &index, &worktree_files)
    }

    /// HEAD vs. index (staged changes).
    pub fn diff_staged(&self) -> Result<Vec<FileDiff>> {
        let store = self.store();
        let head = self.head_tree_map()?;
        let index = self.load_index()?.as_map();
        diff::head_vs_index(&store, &head, &index)
    }

    // ---- log / branch ----

    /// Walk HEAD's first-parent chain, newest first.
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        let store = self.store();
        let refs = self.refs();
        let current_branch = refs.current_branch()?;

        let branch_names = refs.list_branches()?;
        let mut tips: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in &branch_names {
            if let Some(oid) = refs.read_branch(name)? {
                tips.entry(oid).or_default().push(name.clone());
            }
        }

        let mut entries = Vec::new();
        let mut current = self.head_oid()?;
        while let Some(oid) = current {
            let commit = tree_builder::read_commit(&store, &oid)?;
            let branches = tips.get(&oid).cloned().unwrap_or_default();
            let next = commit.parents.first().cloned();
            entries.push(LogEntry {
                oid,
                commit,
                current_branch: current_branch.clone(),
                branches,
            });
            current = next;
        }
        Ok(entries)
    }

    /// Create a branch named `name` pointing at HEAD's current commit. Fails if HEAD has no
    /// commit yet, if `name` contains a path separator, or if the branch already exists.
    pub fn branch(&self, name: &str) -> Result<()> {
        let head = self
            .head_oid()?
            .ok_or_else(|| Error::NoChanges("HEAD has no commit yet".to_string()))?;
        self.refs().new_branch(name, &head)
    }

    pub fn list_branches(&self) -> Result<Vec<String>> {
        self.refs().list_branches()
    }

    pub fn current_branch(&self) -> Result<Option<String>> {
        self.refs().current_branch()
    }

    // ---- checkout / restore / reset ----

    /// Write every path in `target` to the worktree, then delete every path present in
    /// `previous` but absent from `target`.
    fn reconcile_worktree(
        &self,
        previous: &BTreeMap<String, String>,
        target: &BTreeMap<String, String>,
    ) -> Result<()> {
        let store = self.store();
        let worktree = self.worktree();
        for (path, oid) in target {
            if previous.get(path) != Some(oid) {
                let content = store.get(oid)?;
                worktree.write(path, &content)?;
            }
        }
        for path in previous.keys() {
            if !target.contains_key(path) {
                worktree.remove(path)?;
            }
        }
        Ok(())
    }

    /// Switch to `name`. Requires a clean status unless `force`; requires `name` to differ
    /// from the current branch. Reconciles the index and worktree to the target branch's
    /// commit.
    pub fn checkout(&self, name: &str, force: bool) -> Result<()> {
        if !force && !self.is_clean()? {
            return Err(Error::Unclean(
                "you have local changes; commit, stash, or pass --force".to_string(),
            ));
        }
        if Some(name.to_string()) == self.current_branch()? {
            return Err(Error::NoChanges(format!("already on '{name}'")));
        }
        let target_oid = self
            .refs()
            .read_branch(name)?
            .ok_or_else(|| Error::NotFound(format!("branch '{name}'")))?;

        let previous = self.head_tree_map()?;
        let target = tree_builder::walk_commit(&self.store(), Some(&target_oid))?;

        self.refs().write_head_symbolic(name)?;
        Index::from_map(target.clone()).write(&self.index_path())?;
        self.reconcile_worktree(&previous, &target)?;
        Ok(())
    }

    /// `restore`. `staged`: reset the index entry to HEAD's (or drop it if HEAD doesn't have
    /// the path), touching only the index. Unstaged: rewrite the worktree file from the
    /// index's blob.
    pub fn restore(&self, paths: &[String], staged: bool) -> Result<()> {
        let worktree = self.worktree();
        let store = self.store();

        if staged {
            let head = self.head_tree_map()?;
            let mut index = self.load_index()?;
            for raw in paths {
                let path = worktree.normalize(raw)?;
                match head.get(&path) {
                    Some(oid) => index.set(path, oid.clone()),
                    None => {
                        index.remove(&path);
                    }
                }
            }
            index.write(&self.index_path())?;
        } else {
            let index = self.load_index()?;
            for raw in paths {
                let path = worktree.normalize(raw)?;
                let oid = index
                    .get(&path)
                    .ok_or_else(|| Error::NotFound(path.clone()))?;
                let content = store.get(oid)?;
                worktree.write(&path, &content)?;
            }
        }
        Ok(())
    }

    /// Move the current branch to `target` (an oid or a branch name). `soft` only moves the
    /// ref; `mixed` additionally rewrites the index to the target's snapshot; `hard` also
    /// reconciles the worktree.
    pub fn reset(&self, target: &str, mode: ResetMode) -> Result<()> {
        let target_oid = self.resolve_commit(target)?;
        let previous = self.head_tree_map()?;

        self.refs().advance_head(&target_oid)?;

        if mode == ResetMode::Soft {
            return Ok(());
        }

        let target_map = tree_builder::walk_commit(&self.store(), Some(&target_oid))?;
        Index::from_map(target_map.clone()).write(&self.index_path())?;

        if mode == ResetMode::Hard {
            self.reconcile_worktree(&previous, &target_map)?;
        }
        Ok(())
    }

    // ---- merge ----

    /// Merge branch `other` into HEAD. Requires a clean status. On an automatic three-way
    /// merge, writes the merged tree into the index and worktree, records `MERGE_HEAD`, and
    /// creates the merge commit (parents `[HEAD, other]`). A conflict leaves HEAD, the index,
    /// and the worktree untouched.
    pub fn merge(&self, other: &str) -> Result<MergeResult> {
        if !self.is_clean()? {
            return Err(Error::Unclean("you have local changes; commit or stash first".to_string()));
        }

        let head_oid = self
            .head_oid()?
            .ok_or_else(|| Error::NoChanges("HEAD has no commit yet".to_string()))?;
        let other_oid = self
            .refs()
            .read_branch(other)?
            .ok_or_else(|| Error::NotFound(format!("branch '{other}'")))?;

        let store = self.store();
        match merge::three_way(&store, &head_oid, &other_oid)? {
            MergeOutcome::AlreadyUpToDate => Ok(MergeResult::AlreadyUpToDate),
            MergeOutcome::FastForward { new_oid } => {
                let previous = self.head_tree_map()?;
                let branch = self
                    .current_branch()?
                    .ok_or_else(|| Error::Unclean("HEAD is detached".to_string()))?;
                self.refs().write_branch(&branch, &new_oid)?;
                let target = tree_builder::walk_commit(&store, Some(&new_oid))?;
                Index::from_map(target.clone()).write(&self.index_path())?;
                self.reconcile_worktree(&previous, &target)?;
                Ok(MergeResult::FastForward(new_oid))
            }
            MergeOutcome::Merged { tree, parents } => {
                let previous = self.head_tree_map()?;
                Index::from_map(tree.clone()).write(&self.index_path())?;
                self.reconcile_worktree(&previous, &tree)?;
                self.refs().write_merge_head(&other_oid)?;

                let tree_oid = tree_builder::build(&store, &tree)?
                    .ok_or_else(|| Error::NoChanges("merge produced an empty tree".to_string()))?;
                let author = self.author_identity()?;
                let commit = Commit::new(
                    tree_oid,
                    parents,
                    author.clone(),
                    author,
                    merge::default_merge_message(other),
                );
                let oid = store.put(commit.serialize().as_bytes())?;
                let branch = self
                    .current_branch()?
                    .ok_or_else(|| Error::Unclean("HEAD is detached".to_string()))?;
                self.refs().write_branch(&branch, &oid)?;
                self.refs().clear_merge_head()?;
                Ok(MergeResult::Merged(oid))
            }
        }
    }

    // ---- stash ----

    /// Snapshot the worktree into a commit (parented on HEAD and, if one exists, the previous
    /// stash entry) and then hard-reset to HEAD. Requires a non-clean status.
    pub fn stash_push(&self, message: Option<&str>) -> Result<String> {
        if self.is_clean()? {
            return Err(Error::NoChanges("nothing to stash".to_string()));
        }

        let head_oid = self
            .head_oid()?
            .ok_or_else(|| Error::NoChanges("HEAD has no commit yet".to_string()))?;

        self.add_all()?;
        let store = self.store();
        let index = self.load_index()?;
        let tree_oid = tree_builder::build(&store, &index.as_map())?
            .ok_or_else(|| Error::NoChanges("nothing to stash".to_string()))?;

        let mut parents = vec![head_oid.clone()];
        if let Some(prev_stash) = self.refs().read_stash()? {
            parents.push(prev_stash);
        }

        let author = self.author_identity()?;
        let msg = message
            .map(str::to_string)
            .unwrap_or_else(|| "WIP on stash".to_string());
        let commit = Commit::new(tree_oid, parents, author.clone(), author, msg);
        let stash_oid = store.put(commit.serialize().as_bytes())?;
        self.refs().write_stash(&stash_oid)?;

        self.reset(&head_oid, ResetMode::Hard)?;
        Ok(stash_oid)
    }

    /// Three-way merge the top of the stash against current HEAD, using the stash's recorded
    /// pre-stash state as the merge base. On success, advances `refs/stash` to the popped
    /// entry's second parent (or clears it). Conflicts leave the stash intact. Requires a
    /// clean status.
    pub fn stash_pop(&self) -> Result<()> {
        if !self.is_clean()? {
            return Err(Error::Unclean("you have local changes; commit or stash first".to_string()));
        }
        let stash_oid = self
            .refs()
            .read_stash()?
            .ok_or_else(|| Error::NotFound("stash".to_string()))?;
        let head_oid = self
            .head_oid()?
            .ok_or_else(|| Error::NoChanges("HEAD has no commit yet".to_string()))?;

        let store = self.store();
        let (outcome, next_stash) = stash::pop(&store, &stash_oid, &head_oid)?;

        match outcome {
            MergeOutcome::AlreadyUpToDate => {}
            MergeOutcome::FastForward { new_oid } => {
                let previous = self.head_tree_map()?;
                let branch = self
                    .current_branch()?
                    .ok_or_else(|| Error::Unclean("HEAD is detached".to_string()))?;
                self.refs().write_branch(&branch, &new_oid)?;
                let target = tree_builder::walk_commit(&store, Some(&new_oid))?;
                Index::from_map(target.clone()).write(&self.index_path())?;
                self.reconcile_worktree(&previous, &target)?;
            }
            MergeOutcome::Merged { tree, .. } => {
                let previous = self.head_tree_map()?;
                Index::from_map(tree.clone()).write(&self.index_path())?;
                self.reconcile_worktree(&previous, &tree)?;
                // Stash resolution is not a merge commit; clear any MERGE_HEAD the engine
                // would otherwise leave for `commit` to pick up a second parent from.
                self.refs().clear_merge_head()?;
            }
        }

        match next_stash {
            Some(oid) => self.refs().write_stash(&oid)?,
            None => self.refs().clear_stash()?,
        }
        Ok(())
    }

    pub fn stash_list(&self) -> Result<Vec<StashEntry>> {
        stash::list(&self.store(), self.refs().read_stash()?.as_deref())
    }

    // ---- clone ----

    /// Copy another repository's `.bit` directory wholesale and check out its current branch.
    /// Local-filesystem only: there is no network transport in this design.
    pub fn clone_from(src: &Path, dst: &Path) -> Result<Self> {
        let src_bit_dir = src.join(BIT_DIR);
        if !src_bit_dir.is_dir() {
            return Err(Error::NotARepo(src.to_path_buf()));
        }
        let dst_bit_dir = dst.join(BIT_DIR);
        if dst_bit_dir.exists() {
            return Err(Error::AlreadyExists(format!("repository at {}", dst_bit_dir.display())));
        }

        fs::create_dir_all(dst)?;
        copy_dir_recursive(&src_bit_dir, &dst_bit_dir)?;

        let repo = Self { root: dst.to_path_buf(), bit_dir: dst_bit_dir };
        if let Some(branch) = repo.current_branch()? {
            if let Some(oid) = repo.refs().read_branch(&branch)? {
                let target = tree_builder::walk_commit(&repo.store(), Some(&oid))?;
                Index::from_map(target.clone()).write(&repo.index_path())?;
                repo.reconcile_worktree(&BTreeMap::new(), &target)?;
            }
        }
        Ok(repo)
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(repo: &Repository, path: &str, content: &str) {
        repo.worktree().write(path, content.as_bytes()).unwrap();
    }

    #[test]
    fn init_rejects_existing_repo() {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(Repository::init(dir.path()).is_err());
    }

    #[test]
    fn add_commit_log_round_trip() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "README.md", "Welcome!");
        repo.add(&["README.md".to_string()]).unwrap();
        let oid = repo.commit("Initial commit").unwrap();

        let log = repo.log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].oid, oid);
        assert!(log[0].commit.is_initial());
        assert_eq!(log[0].commit.message, "Initial commit");
    }

    #[test]
    fn commit_with_no_changes_is_rejected() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "a.txt", "a");
        repo.add(&["a.txt".to_string()]).unwrap();
        repo.commit("first").unwrap();
        assert!(repo.commit("again").is_err());
    }

    #[test]
    fn status_reports_every_kind() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        for (name, content) in [("a", "a_v1"), ("b", "b_v1"), ("c", "c_v1"), ("d", "d_v1")] {
            write(&repo, name, content);
        }
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        write(&repo, "a", "a_v2");
        repo.add(&["a".to_string()]).unwrap();

        write(&repo, "b", "b_v2");
        repo.rm("c").unwrap();
        repo.worktree().remove("d").unwrap();
        write(&repo, "e", "e_v1");

        let status = repo.status().unwrap();
        assert_eq!(status.staged.get("a"), Some(&StatusKind::Modified));
        assert_eq!(status.staged.get("c"), Some(&StatusKind::Deleted));
        assert_eq!(status.unstaged.get("b"), Some(&StatusKind::Modified));
        assert_eq!(status.unstaged.get("d"), Some(&StatusKind::Deleted));
        assert_eq!(status.untracked, vec!["e".to_string()]);
    }

    #[test]
    fn reset_hard_removes_later_file() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "file1", "one");
        repo.add_all().unwrap();
        let c1 = repo.commit("c1").unwrap();

        write(&repo, "file2", "two");
        repo.add_all().unwrap();
        repo.commit("c2").unwrap();

        repo.reset(&c1, ResetMode::Hard).unwrap();
        assert!(!repo.worktree().exists("file2"));
        assert!(!repo.load_index().unwrap().contains("file2"));
        assert_eq!(repo.refs().read_branch("master").unwrap().as_deref(), Some(c1.as_str()));
    }

    #[test]
    fn branch_checkout_round_trips_worktree() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "a.txt", "a");
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        repo.branch("feature").unwrap();
        repo.checkout("feature", false).unwrap();
        repo.checkout("master", false).unwrap();

        assert_eq!(repo.worktree().read("a.txt").unwrap(), b"a");
    }

    #[test]
    fn fast_forward_merge_advances_branch_and_worktree() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "a.txt", "a");
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        repo.branch("feature").unwrap();
        repo.checkout("feature", false).unwrap();
        write(&repo, "f.txt", "feature change");
        repo.add_all().unwrap();
        repo.commit("f").unwrap();

        repo.checkout("master", false).unwrap();
        let result = repo.merge("feature").unwrap();
        assert!(matches!(result, MergeResult::FastForward(_)));
        assert_eq!(repo.worktree().read("f.txt").unwrap(), b"feature change");
    }

    #[test]
    fn automatic_three_way_merge_keeps_both_additions() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "base.txt", "base");
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        repo.branch("side").unwrap();
        write(&repo, "master_only.txt", "m");
        repo.add_all().unwrap();
        repo.commit("master change").unwrap();

        repo.checkout("side", false).unwrap();
        write(&repo, "side_only.txt", "s");
        repo.add_all().unwrap();
        repo.commit("side change").unwrap();

        repo.checkout("master", false).unwrap();
        let result = repo.merge("side").unwrap();
        assert!(matches!(result, MergeResult::Merged(_)));
        assert!(repo.worktree().exists("master_only.txt"));
        assert!(repo.worktree().exists("side_only.txt"));
    }

    #[test]
    fn modify_modify_conflict_leaves_worktree_untouched() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "f.txt", "line1\nline2\n");
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        repo.branch("side").unwrap();
        write(&repo, "f.txt", "side\nline2\n");
        repo.add_all().unwrap();
        repo.commit("side change").unwrap();

        repo.checkout("master", false).unwrap();
        write(&repo, "f.txt", "master\nline2\n");
        repo.add_all().unwrap();
        repo.commit("master change").unwrap();

        let err = repo.merge("side").unwrap_err();
        assert!(matches!(err, Error::MergeConflict { .. }));
        assert_eq!(repo.worktree().read("f.txt").unwrap(), b"master\nline2\n");
        assert!(repo.refs().read_merge_head().unwrap().is_none());
    }

    #[test]
    fn stash_push_then_pop_restores_worktree() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        write(&repo, "a.txt", "a1");
        repo.add_all().unwrap();
        repo.commit("base").unwrap();

        write(&repo, "a.txt", "a2");
        repo.stash_push(None).unwrap();
        assert_eq!(repo.worktree().read("a.txt").unwrap(), b"a1");

        repo.stash_pop().unwrap();
        assert_eq!(repo.worktree().read("a.txt").unwrap(), b"a2");
        assert!(repo.refs().read_stash().unwrap().is_none());
    }
}
