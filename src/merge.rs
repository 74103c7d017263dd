//! # Merge engine
//!
//! Three-way merge: locate the common ancestor of two commits, classify every path that
//! either side touched, and either merge automatically or report every conflicting path in
//! one pass. Conflict detection and state mutation are atomic — nothing is written until no
//! conflicts remain. Grounded on the original implementation's `merge` module: a two-phase
//! BFS for the merge base (collect HEAD's full ancestor set, then walk OTHER until hitting
//! it), and per-path classification by comparing base/head/other oids.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::diff::{self, FileDiff};
use crate::error::{Error, Result};
use crate::objects::Commit;
use crate::store::Store;
use crate::tree_builder;

#[derive(Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    AlreadyUpToDate,
    FastForward { new_oid: String },
    Merged { tree: BTreeMap<String, String>, parents: Vec<String> },
}

fn parents_of(store: &Store, oid: &str) -> Result<Vec<String>> {
    Ok(tree_builder::read_commit(store, oid)?.parents)
}

/// Ancestor set of `oid`, including `oid` itself, following every parent edge.
fn ancestor_set(store: &Store, oid: &str) -> Result<BTreeSet<String>> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(oid.to_string());
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.clone()) {
            continue;
        }
        for parent in parents_of(store, &current)? {
            queue.push_back(parent);
        }
    }
    Ok(seen)
}

/// Two-phase BFS: collect `head`'s ancestors, then walk from `other` until hitting one.
pub fn merge_base(store: &Store, head: &str, other: &str) -> Result<Option<String>> {
    if head == other {
        return Ok(Some(head.to_string()));
    }
    let head_ancestors = ancestor_set(store, head)?;
    if head_ancestors.contains(other) {
        return Ok(Some(other.to_string()));
    }

    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(other.to_string());
    while let Some(current) = queue.pop_front() {
        if head_ancestors.contains(&current) {
            return Ok(Some(current));
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        for parent in parents_of(store, &current)? {
            queue.push_back(parent);
        }
    }
    Ok(None)
}

fn status_line_diff(store: &Store, path: &str, base_oid: Option<&str>, other_oid: Option<&str>) -> Result<FileDiff> {
    match (base_oid, other_oid) {
        (Some(b), Some(o)) => diff::blob_vs_blob(store, path, b, o, 0),
        (None, Some(o)) => Ok(FileDiff {
            path: path.to_string(),
            status: crate::diff::FileStatus::Added,
            old_oid: None,
            new_oid: Some(o.to_string()),
            hunks: diff::diff_lines("", &store.get_text(o).unwrap_or_default(), 0),
        }),
        (Some(b), None) => Ok(FileDiff {
            path: path.to_string(),
            status: crate::diff::FileStatus::Deleted,
            old_oid: Some(b.to_string()),
            new_oid: None,
            hunks: diff::diff_lines(&store.get_text(b).unwrap_or_default(), "", 0),
        }),
        (None, None) => unreachable!("diffing a path absent on both sides"),
    }
}

/// Run the three-way merge of `other_oid` into `head_oid`. Neither ref nor any on-disk state
/// is touched by this function — callers translate the returned outcome into ref/index/
/// worktree updates.
pub fn three_way(store: &Store, head_oid: &str, other_oid: &str) -> Result<MergeOutcome> {
    let base = merge_base(store, head_oid, other_oid)?;

    if let Some(base) = &base {
        if base == other_oid {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }
        if base == head_oid {
            return Ok(MergeOutcome::FastForward { new_oid: other_oid.to_string() });
        }
    }

    let base_oid = base.as_deref();
    let base_map = tree_builder::walk_commit(store, base_oid)?;
    let head_map = tree_builder::walk_commit(store, Some(head_oid))?;
    let other_map = tree_builder::walk_commit(store, Some(other_oid))?;

    three_way_with_maps(store, head_oid, other_oid, &base_map, &head_map, &other_map)
}

/// The per-path classification core of `three_way`, parameterized over the three maps so
/// callers that need a different merge base (stash's `pop`, which overrides the base to the
/// stash's own first parent) can reuse it without going through `merge_base` again.
pub fn three_way_with_maps(
    store: &Store,
    head_oid: &str,
    other_oid: &str,
    base_map: &BTreeMap<String, String>,
    head_map: &BTreeMap<String, String>,
    other_map: &BTreeMap<String, String>,
) -> Result<MergeOutcome> {
    let mut paths: BTreeSet<&String> = BTreeSet::new();
    paths.extend(base_map.keys());
    paths.extend(head_map.keys());
    paths.extend(other_map.keys());

    let mut merged = BTreeMap::new();
    let mut modify_conflicts = Vec::new();
    let mut delete_conflicts = Vec::new();

    for path in paths {
        let b = base_map.get(path).map(String::as_str);
        let h = head_map.get(path).map(String::as_str);
        let o = other_map.get(path).map(String::as_str);

        if h == o {
            if let Some(oid) = h {
                merged.insert(path.clone(), oid.to_string());
            }
            continue;
        }
        if h == b {
            if let Some(oid) = o {
                merged.insert(path.clone(), oid.to_string());
            }
            continue;
        }
        if o == b {
            if let Some(oid) = h {
                merged.insert(path.clone(), oid.to_string());
            }
            continue;
        }

        // Both sides touched this path relative to base, and disagree.
        match (b, h, o) {
            (Some(base_oid), Some(head_oid_blob), Some(other_oid_blob)) => {
                let head_diff = diff::blob_vs_blob(store, path, base_oid, head_oid_blob, 0)?;
                let other_diff = diff::blob_vs_blob(store, path, base_oid, other_oid_blob, 0)?;
                if head_diff.conflicts_with(&other_diff) {
                    modify_conflicts.push(status_line_diff(store, path, h, o)?);
                } else {
                    // Non-overlapping hunks: the façade-visible result keeps HEAD's oid per
                    // the documented rule; `stitch_lines` (below) computes the actually-woven
                    // text and is exercised directly by tests, not by this path.
                    merged.insert(path.clone(), head_oid_blob.to_string());
                }
            }
            _ => {
                // Present on one side, absent on the other, and both differ from base:
                // a delete/modify conflict.
                delete_conflicts.push(path.clone());
            }
        }
    }

    if !modify_conflicts.is_empty() || !delete_conflicts.is_empty() {
        return Err(Error::MergeConflict { modify: modify_conflicts, delete: delete_conflicts });
    }

    Ok(MergeOutcome::Merged { tree: merged, parents: vec![head_oid.to_string(), other_oid.to_string()] })
}

/// Weave two non-overlapping edits of the same base text into one result. This is the
/// line-level primitive behind the "no conflict" branch of `three_way`'s classification; the
/// façade always picks HEAD's oid instead of calling this, per the recorded design decision,
/// but the primitive is correct and tested independently.
pub fn stitch_lines(base: &str, ours: &str, theirs: &str) -> Result<String> {
    let ours_hunks = diff::diff_lines(base, ours, 0);
    let theirs_hunks = diff::diff_lines(base, theirs, 0);

    let base_lines: Vec<&str> = if base.is_empty() { Vec::new() } else { base.split_inclusive('\n').collect() };
    let mut result = String::new();
    let mut cursor = 0usize; // 1-based old-line cursor, tracked as 0-based index

    let mut ours_iter = ours_hunks.into_iter().peekable();
    let mut theirs_iter = theirs_hunks.into_iter().peekable();

    loop {
        let next_hunk = match (ours_iter.peek(), theirs_iter.peek()) {
            (Some(a), Some(b)) => Some(if a.old_start <= b.old_start { ours_iter.next().unwrap() } else { theirs_iter.next().unwrap() }),
            (Some(_), None) => ours_iter.next(),
            (None, Some(_)) => theirs_iter.next(),
            (None, None) => None,
        };
        match next_hunk {
            Some(hunk) => {
                let start = hunk.old_start.saturating_sub(1);
                while cursor < start && cursor < base_lines.len() {
                    result.push_str(base_lines[cursor]);
                    cursor += 1;
                }
                for line in &hunk.lines {
                    if line.tag != crate::diff::LineTag::Deletion {
                        result.push_str(&line.text);
                    }
                }
                cursor = start + hunk.old_count;
            }
            None => break,
        }
    }
    while cursor < base_lines.len() {
        result.push_str(base_lines[cursor]);
        cursor += 1;
    }
    Ok(result)
}

pub fn default_merge_message(other_branch: &str) -> String {
    format!("Merge branch '{other_branch}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::commit::Author;
    use tempfile::tempdir;

    fn commit(store: &Store, tree: &str, parents: Vec<String>) -> String {
        let author = Author::with_timestamp("T", "t@t.com", 1, "+0000");
        let c = Commit::new(tree.to_string(), parents, author.clone(), author, "m".to_string());
        store.put(c.serialize().as_bytes()).unwrap()
    }

    #[test]
    fn merge_base_finds_common_ancestor() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());

        let root = commit(&store, "t0", vec![]);
        let left = commit(&store, "t1", vec![root.clone()]);
        let right = commit(&store, "t2", vec![root.clone()]);

        assert_eq!(merge_base(&store, &left, &right).unwrap(), Some(root));
    }

    #[test]
    fn already_up_to_date_when_base_equals_other() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let root = commit(&store, "t0", vec![]);
        let child = commit(&store, "t1", vec![root.clone()]);

        let outcome = three_way(&store, &child, &root).unwrap();
        assert_eq!(outcome, MergeOutcome::AlreadyUpToDate);
    }

    #[test]
    fn fast_forward_when_base_equals_head() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let root = commit(&store, "t0", vec![]);
        let child = commit(&store, "t1", vec![root.clone()]);

        let outcome = three_way(&store, &root, &child).unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward { new_oid: child });
    }

    #[test]
    fn stitch_lines_weaves_non_overlapping_changes() {
        let base = "1\n2\n3\n4\n5\n";
        let ours = "ONE\n2\n3\n4\n5\n";
        let theirs = "1\n2\n3\n4\nFIVE\n";
        let result = stitch_lines(base, ours, theirs).unwrap();
        assert_eq!(result, "ONE\n2\n3\n4\nFIVE\n");
    }
}
