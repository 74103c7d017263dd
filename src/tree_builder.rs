//! # Tree builder and walker
//!
//! Converts between the flat index representation (`path -> oid`) and the store's
//! hierarchical tree objects, in both directions. `build` groups index entries by path
//! component, recursing bottom-up the way the original prototype's `build_file_structure` /
//! `build_tree` functions do; `walk_commit` flattens a commit's root tree back into a flat
//! map for diffing and status.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::objects::{Commit, Kind, Tree, TreeEntry};
use crate::store::Store;

/// A node in the path trie built up while grouping index entries by directory.
enum Node {
    Blob(String),
    Tree(BTreeMap<String, Node>),
}

/// Build tree objects from a flat index map and return the root tree's oid.
///
/// Returns `None` if the index is empty (there is no meaningful empty root tree to point a
/// commit at).
pub fn build(store: &Store, index: &BTreeMap<String, String>) -> Result<Option<String>> {
    if index.is_empty() {
        return Ok(None);
    }

    let mut root: BTreeMap<String, Node> = BTreeMap::new();
    for (path, oid) in index {
        let components: Vec<&str> = path.split('/').collect();
        insert(&mut root, &components, oid);
    }

    Ok(Some(write_node(store, &Node::Tree(root))?))
}

fn insert(level: &mut BTreeMap<String, Node>, components: &[&str], oid: &str) {
    if components.len() == 1 {
        level.insert(components[0].to_string(), Node::Blob(oid.to_string()));
        return;
    }
    let head = components[0];
    let child = level
        .entry(head.to_string())
        .or_insert_with(|| Node::Tree(BTreeMap::new()));
    if let Node::Tree(ref mut sub) = child {
        insert(sub, &components[1..], oid);
    }
}

fn write_node(store: &Store, node: &Node) -> Result<String> {
    match node {
        Node::Blob(oid) => Ok(oid.clone()),
        Node::Tree(children) => {
            let mut entries = Vec::with_capacity(children.len());
            for (name, child) in children {
                match child {
                    Node::Blob(oid) => entries.push(TreeEntry {
                        kind: Kind::Blob,
                        oid: oid.clone(),
                        name: name.clone(),
                    }),
                    Node::Tree(_) => {
                        let oid = write_node(store, child)?;
                        entries.push(TreeEntry { kind: Kind::Tree, oid, name: name.clone() });
                    }
                }
            }
            let tree = Tree::new(entries);
            store.put(&tree.serialize())
        }
    }
}

/// Flatten a commit's root tree into a `path -> oid` map. `None` yields the empty map (the
/// state before any commit exists).
pub fn walk_commit(store: &Store, commit_oid: Option<&str>) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    let Some(oid) = commit_oid else {
        return Ok(out);
    };
    let commit = read_commit(store, oid)?;
    walk_tree(store, &commit.tree, "", &mut out)?;
    Ok(out)
}

pub fn read_commit(store: &Store, oid: &str) -> Result<Commit> {
    let text = store.get_text(oid)?;
    Commit::parse(&text)
}

fn walk_tree(store: &Store, tree_oid: &str, prefix: &str, out: &mut BTreeMap<String, String>) -> Result<()> {
    let bytes = store.get(tree_oid)?;
    let tree = Tree::parse(&bytes)?;
    for entry in &tree.entries {
        let full = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        if entry.is_tree() {
            walk_tree(store, &entry.oid, &full, out)?;
        } else {
            out.insert(full, entry.oid.clone());
        }
    }
    Ok(())
}

/// Lightweight lookup table for walking a tree incrementally, used by single-file checkout.
pub fn resolve_path(store: &Store, tree_oid: &str, path: &str) -> Result<Option<String>> {
    let map = {
        let mut out = BTreeMap::new();
        walk_tree(store, tree_oid, "", &mut out)?;
        out
    };
    Ok(map.get(path).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn build_groups_nested_paths_and_walk_recovers_them() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());

        let mut index = BTreeMap::new();
        index.insert("a.txt".to_string(), Store::hash(b"a"));
        index.insert("sub/b.txt".to_string(), Store::hash(b"b"));
        index.insert("sub/deep/c.txt".to_string(), Store::hash(b"c"));
        store.put(b"a").unwrap();
        store.put(b"b").unwrap();
        store.put(b"c").unwrap();

        let root = build(&store, &index).unwrap().unwrap();

        let mut flat = BTreeMap::new();
        walk_tree(&store, &root, "", &mut flat).unwrap();
        assert_eq!(flat, index);
    }

    #[test]
    fn identical_index_contents_build_identical_root_regardless_of_order() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        store.put(b"a").unwrap();
        store.put(b"b").unwrap();

        let mut index1 = BTreeMap::new();
        index1.insert("a.txt".to_string(), Store::hash(b"a"));
        index1.insert("z.txt".to_string(), Store::hash(b"b"));

        let mut index2 = BTreeMap::new();
        index2.insert("z.txt".to_string(), Store::hash(b"b"));
        index2.insert("a.txt".to_string(), Store::hash(b"a"));

        assert_eq!(build(&store, &index1).unwrap(), build(&store, &index2).unwrap());
    }

    #[test]
    fn empty_index_has_no_root_tree() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        assert_eq!(build(&store, &BTreeMap::new()).unwrap(), None);
    }

    #[test]
    fn walk_commit_of_none_is_empty() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        assert!(walk_commit(&store, None).unwrap().is_empty());
    }
}
