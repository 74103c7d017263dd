//! # Ref store
//!
//! Named, mutable pointers to commit oids, plus the symbolic `HEAD` ref. Branches live under
//! `refs/heads/<name>`; the stash stack tip lives at `refs/stash`.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct RefStore {
    bit_dir: PathBuf,
}

impl RefStore {
    pub fn new(bit_dir: PathBuf) -> Self {
        Self { bit_dir }
    }

    fn heads_dir(&self) -> PathBuf {
        self.bit_dir.join("refs").join("heads")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir().join(name)
    }

    fn head_path(&self) -> PathBuf {
        self.bit_dir.join("HEAD")
    }

    fn merge_head_path(&self) -> PathBuf {
        self.bit_dir.join("MERGE_HEAD")
    }

    fn stash_path(&self) -> PathBuf {
        self.bit_dir.join("refs").join("stash")
    }

    /// Read a ref file's raw contents (trimmed), if it exists.
    fn read_raw(&self, path: &PathBuf) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(content.trim().to_string()))
    }

    fn write_raw(&self, path: &PathBuf, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve a branch name to its commit oid, or `None` if the branch has no commits yet.
    pub fn read_branch(&self, name: &str) -> Result<Option<String>> {
        self.read_raw(&self.branch_path(name))
    }

    pub fn write_branch(&self, name: &str, oid: &str) -> Result<()> {
        self.write_raw(&self.branch_path(name), oid)
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).exists()
    }

    /// Create a new branch pointing at `oid`. Fails if the name already exists or contains a
    /// path separator.
    pub fn new_branch(&self, name: &str, oid: &str) -> Result<()> {
        if name.contains('/') || name.contains('\\') || name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.branch_exists(name) {
            return Err(Error::AlreadyExists(format!("branch '{name}'")));
        }
        self.write_branch(name, oid)
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let path = self.branch_path(name);
        if !path.exists() {
            return Err(Error::NotFound(format!("branch '{name}'")));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn list_branches(&self) -> Result<Vec<String>> {
        let dir = self.heads_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read HEAD's raw content: `"ref: refs/heads/<name>"` or a raw oid (detached).
    pub fn read_head_raw(&self) -> Result<String> {
        self.read_raw(&self.head_path())?
            .ok_or_else(|| Error::Corrupt("HEAD is missing".to_string()))
    }

    pub fn write_head_symbolic(&self, branch: &str) -> Result<()> {
        self.write_raw(&self.head_path(), &format!("ref: refs/heads/{branch}\n"))
    }

    pub fn write_head_detached(&self, oid: &str) -> Result<()> {
        self.write_raw(&self.head_path(), oid)
    }

    /// The name of the attached branch, or `None` if HEAD is detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let raw = self.read_head_raw()?;
        Ok(raw
            .strip_prefix("ref: refs/heads/")
            .map(|s| s.trim().to_string()))
    }

    /// The commit oid HEAD currently resolves to, if any commit exists yet.
    pub fn read_head(&self) -> Result<Option<String>> {
        let raw = self.read_head_raw()?;
        match raw.strip_prefix("ref: ") {
            Some(symbolic) => {
                let branch = symbolic
                    .strip_prefix("refs/heads/")
                    .ok_or_else(|| Error::Corrupt(format!("unsupported HEAD target: {symbolic}")))?;
                self.read_branch(branch.trim())
            }
            None => Ok(Some(raw)),
        }
    }

    /// Advance whatever HEAD points at (the current branch, or HEAD itself if detached) to
    /// `oid`.
    pub fn advance_head(&self, oid: &str) -> Result<()> {
        let raw = self.read_head_raw()?;
        match raw.strip_prefix("ref: ") {
            Some(symbolic) => {
                let branch = symbolic
                    .strip_prefix("refs/heads/")
                    .ok_or_else(|| Error::Corrupt(format!("unsupported HEAD target: {symbolic}")))?;
                self.write_branch(branch.trim(), oid)
            }
            None => self.write_head_detached(oid),
        }
    }

    pub fn read_merge_head(&self) -> Result<Option<String>> {
        self.read_raw(&self.merge_head_path())
    }

    pub fn write_merge_head(&self, oid: &str) -> Result<()> {
        self.write_raw(&self.merge_head_path(), oid)
    }

    pub fn clear_merge_head(&self) -> Result<()> {
        let path = self.merge_head_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn read_stash(&self) -> Result<Option<String>> {
        self.read_raw(&self.stash_path())
    }

    pub fn write_stash(&self, oid: &str) -> Result<()> {
        self.write_raw(&self.stash_path(), oid)
    }

    pub fn clear_stash(&self) -> Result<()> {
        let path = self.stash_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_store() -> (tempfile::TempDir, RefStore) {
        let dir = tempdir().unwrap();
        let bit_dir = dir.path().join(".bit");
        fs::create_dir_all(bit_dir.join("refs").join("heads")).unwrap();
        (dir, RefStore::new(bit_dir))
    }

    #[test]
    fn new_branch_rejects_duplicates_and_slashes() {
        let (_d, refs) = new_store();
        refs.new_branch("main", "aaaa").unwrap();
        assert!(refs.new_branch("main", "bbbb").is_err());
        assert!(refs.new_branch("feat/x", "bbbb").is_err());
    }

    #[test]
    fn head_resolution_follows_symbolic_ref() {
        let (_d, refs) = new_store();
        refs.write_head_symbolic("master").unwrap();
        assert_eq!(refs.current_branch().unwrap().as_deref(), Some("master"));
        assert_eq!(refs.read_head().unwrap(), None);

        refs.write_branch("master", "deadbeef").unwrap();
        assert_eq!(refs.read_head().unwrap().as_deref(), Some("deadbeef"));
    }

    #[test]
    fn advance_head_updates_attached_branch() {
        let (_d, refs) = new_store();
        refs.write_head_symbolic("master").unwrap();
        refs.advance_head("cafe").unwrap();
        assert_eq!(refs.read_branch("master").unwrap().as_deref(), Some("cafe"));
    }
}
