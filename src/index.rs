//! # Index
//!
//! The staging area: an ordered mapping of repository-relative path to blob oid. Persisted as
//! plain-text lines `"<oid> <path>"`, sorted by path. Unlike a tree, the index carries no
//! directory structure — it is simply the flat set of paths the next commit will contain.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone)]
pub struct Index {
    entries: BTreeMap<String, String>,
}

impl Index {
    pub fn load(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let mut entries = BTreeMap::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (oid, path) = line
                .split_once(' ')
                .ok_or_else(|| Error::Corrupt(format!("index line {}: {line}", lineno + 1)))?;
            entries.insert(path.to_string(), oid.to_string());
        }
        Ok(Self { entries })
    }

    pub fn write(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = String::new();
        for (path, oid) in &self.entries {
            content.push_str(oid);
            content.push(' ');
            content.push_str(path);
            content.push('\n');
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn set(&mut self, path: impl Into<String>, oid: impl Into<String>) {
        self.entries.insert(path.into(), oid.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&String> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }

    pub fn as_map(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }

    pub fn from_map(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut index = Index::default();
        index.set("b.txt", "bbb");
        index.set("a.txt", "aaa");
        index.write(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "aaa a.txt\nbbb b.txt\n");

        let loaded = Index::load(&path).unwrap();
        assert_eq!(loaded.get("a.txt"), Some(&"aaa".to_string()));
        assert_eq!(loaded.get("b.txt"), Some(&"bbb".to_string()));
    }

    #[test]
    fn missing_file_is_empty_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");
        let index = Index::load(&path).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn remove_drops_entry() {
        let mut index = Index::default();
        index.set("a.txt", "aaa");
        assert!(index.remove("a.txt").is_some());
        assert!(!index.contains("a.txt"));
    }
}
