//! # Tree object
//!
//! A tree represents a directory snapshot: an ordered list of entries, each either a `blob`
//! (file contents) or a nested `tree` (subdirectory). The payload is plain text, one entry per
//! line: `"<kind> <oid> <name>"`, sorted by `name` in ASCII order. There is no binary framing
//! and no mode bits — executable/symlink tracking is outside this design's scope.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Blob,
    Tree,
}

impl Kind {
    fn as_str(&self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Kind::Blob),
            "tree" => Ok(Kind::Tree),
            other => Err(Error::Corrupt(format!("unknown tree entry kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub kind: Kind,
    pub oid: String,
    pub name: String,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.kind == Kind::Tree
    }

    pub fn is_blob(&self) -> bool {
        self.kind == Kind::Blob
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// Canonical plain-text payload: one line per entry, sorted by name, no trailing
    /// newline after the final entry.
    pub fn serialize(&self) -> Vec<u8> {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {} {}", e.kind.as_str(), e.oid, e.name))
            .collect();
        lines.join("\n").into_bytes()
    }

    pub fn parse(content: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(content)
            .map_err(|_| Error::Corrupt("tree payload is not valid utf-8".to_string()))?;
        let mut entries = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ' ');
            let kind = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line}")))?;
            let oid = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line}")))?;
            let name = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line}")))?;
            entries.push(TreeEntry {
                kind: Kind::parse(kind)?,
                oid: oid.to_string(),
                name: name.to_string(),
            });
        }
        Ok(Self { entries })
    }

    pub fn find(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_sorts_by_name() {
        let tree = Tree::new(vec![
            TreeEntry { kind: Kind::Blob, oid: "b".repeat(40), name: "zeta.txt".to_string() },
            TreeEntry { kind: Kind::Tree, oid: "a".repeat(40), name: "alpha".to_string() },
        ]);
        let text = String::from_utf8(tree.serialize()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("alpha"));
        assert!(lines[1].ends_with("zeta.txt"));
    }

    #[test]
    fn round_trips() {
        let tree = Tree::new(vec![
            TreeEntry { kind: Kind::Blob, oid: "c".repeat(40), name: "file.txt".to_string() },
            TreeEntry { kind: Kind::Tree, oid: "d".repeat(40), name: "sub".to_string() },
        ]);
        let bytes = tree.serialize();
        let parsed = Tree::parse(&bytes).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.find("file.txt").unwrap().oid, "c".repeat(40));
        assert!(parsed.find("sub").unwrap().is_tree());
    }

    #[test]
    fn identical_directory_contents_hash_identically_regardless_of_insertion_order() {
        let a = Tree::new(vec![
            TreeEntry { kind: Kind::Blob, oid: "1".repeat(40), name: "a".to_string() },
            TreeEntry { kind: Kind::Blob, oid: "2".repeat(40), name: "b".to_string() },
        ]);
        let b = Tree::new(vec![
            TreeEntry { kind: Kind::Blob, oid: "2".repeat(40), name: "b".to_string() },
            TreeEntry { kind: Kind::Blob, oid: "1".repeat(40), name: "a".to_string() },
        ]);
        assert_eq!(a.serialize(), b.serialize());
    }
}
