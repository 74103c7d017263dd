//! # Worktree adapter
//!
//! File IO against the repository's working directory: reading, writing, removing files, and
//! enumerating everything that is not `.bit`, not `.git`, and not matched by `.bitignore`.
//! Mirrors `read_file`/`write_file`/`remove_file`/`list_files` from the original Python
//! implementation's `worktree` module, including the behavior of walking back up and removing
//! now-empty parent directories after a file is deleted.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ignore::IgnoreRules;
use crate::store::Store;

pub struct Worktree {
    root: PathBuf,
}

impl Worktree {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Resolve a user-supplied path (relative to the root, or absolute) into a repository-
    /// relative, slash-separated path, lexically collapsing `.`/`..` components. Rejects any
    /// path that would escape the repository root.
    pub fn normalize(&self, path: &str) -> Result<String> {
        use std::path::Component;

        let input = Path::new(path);
        let components: Vec<Component> = if input.is_absolute() {
            let stripped = input
                .strip_prefix(&self.root)
                .map_err(|_| Error::NotFound(format!("path escapes repository root: {path}")))?;
            stripped.components().collect()
        } else {
            input.components().collect()
        };

        let mut parts: Vec<String> = Vec::new();
        for component in components {
            match component {
                Component::Normal(s) => {
                    let s = s
                        .to_str()
                        .ok_or_else(|| Error::Corrupt(format!("non-utf8 path: {path}")))?;
                    parts.push(s.to_string());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(Error::NotFound(format!("path escapes repository root: {path}")));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Ok(parts.join("/"))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.absolute(path).exists()
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.absolute(path))?)
    }

    pub fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        let full = self.absolute(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }

    /// Remove a file, then remove any now-empty ancestor directories up to (not including)
    /// the worktree root.
    pub fn remove(&self, path: &str) -> Result<()> {
        let full = self.absolute(path);
        if full.exists() {
            fs::remove_file(&full)?;
        }
        let mut dir = full.parent().map(Path::to_path_buf);
        while let Some(d) = dir {
            if d == self.root || !d.starts_with(&self.root) {
                break;
            }
            match fs::read_dir(&d) {
                Ok(mut entries) if entries.next().is_none() => {
                    fs::remove_dir(&d)?;
                    dir = d.parent().map(Path::to_path_buf);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Recursively enumerate worktree-relative paths, skipping `.bit`/`.git` and anything
    /// matched by the supplied ignore rules.
    pub fn list(&self, ignore: &IgnoreRules) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).into_iter().filter_entry(|e| {
            let rel = match e.path().strip_prefix(&self.root) {
                Ok(r) => r,
                Err(_) => return true,
            };
            if rel.as_os_str().is_empty() {
                return true;
            }
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if rel_str == ".bit" || rel_str.starts_with(".bit/") {
                return false;
            }
            if rel_str == ".git" || rel_str.starts_with(".git/") {
                return false;
            }
            !ignore.is_ignored(&rel_str, e.file_type().is_dir())
        }) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                    files.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Same as `list`, paired with the SHA-1 of each file's current contents.
    pub fn list_with_hashes(&self, ignore: &IgnoreRules) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for path in self.list(ignore)? {
            let content = self.read(&path)?;
            out.push((path, Store::hash(&content)));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn remove_cleans_up_empty_parent_directories() {
        let dir = tempdir().unwrap();
        let wt = Worktree::new(dir.path().to_path_buf());
        wt.write("a/b/c.txt", b"hi").unwrap();
        assert!(wt.exists("a/b/c.txt"));

        wt.remove("a/b/c.txt").unwrap();
        assert!(!wt.exists("a/b/c.txt"));
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn remove_keeps_nonempty_ancestor() {
        let dir = tempdir().unwrap();
        let wt = Worktree::new(dir.path().to_path_buf());
        wt.write("a/b/c.txt", b"hi").unwrap();
        wt.write("a/keep.txt", b"stays").unwrap();

        wt.remove("a/b/c.txt").unwrap();
        assert!(!dir.path().join("a/b").exists());
        assert!(dir.path().join("a/keep.txt").exists());
    }

    #[test]
    fn list_skips_bit_dir_and_ignored_files() {
        let dir = tempdir().unwrap();
        let wt = Worktree::new(dir.path().to_path_buf());
        wt.write(".bit/HEAD", b"ref: refs/heads/master\n").unwrap();
        wt.write("tracked.txt", b"hi").unwrap();
        wt.write("build.log", b"noise").unwrap();
        fs::write(dir.path().join(".bitignore"), "*.log\n").unwrap();

        let ignore = IgnoreRules::load(&dir.path().join(".bitignore")).unwrap();
        let files = wt.list(&ignore).unwrap();
        assert_eq!(files, vec!["tracked.txt".to_string()]);
    }

    #[test]
    fn normalize_collapses_dot_components() {
        let dir = tempdir().unwrap();
        let wt = Worktree::new(dir.path().to_path_buf());
        assert_eq!(wt.normalize("./a/./b.txt").unwrap(), "a/b.txt");
        assert_eq!(wt.normalize("a/sub/../b.txt").unwrap(), "a/b.txt");
    }

    #[test]
    fn normalize_rejects_escape_above_root() {
        let dir = tempdir().unwrap();
        let wt = Worktree::new(dir.path().to_path_buf());
        assert!(wt.normalize("../escape.txt").is_err());
        assert!(wt.normalize("a/../../escape.txt").is_err());
    }
}
