//! # Diff engine
//!
//! Line-level diffing between two byte buffers via a Myers O(ND) edit script, grouped into
//! unified-diff hunks, plus the three comparison modes the façade and merge engine need:
//! index-vs-worktree, HEAD-vs-index, and blob-vs-blob. A hunk's `(old_start, old_count,
//! new_start, new_count)` header is used both for textual rendering and, at zero context, for
//! merge conflict detection (closed-interval overlap of the old-side ranges).

use std::collections::BTreeMap;

use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy)]
struct Edit {
    op: EditOp,
    old_index: usize,
    new_index: usize,
}

/// Myers diff over lines. Returns an edit script walking both sequences from start to end.
fn myers_diff(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();

    if n == 0 && m == 0 {
        return Vec::new();
    }
    if n == 0 {
        return (0..m).map(|j| Edit { op: EditOp::Insert, old_index: 0, new_index: j }).collect();
    }
    if m == 0 {
        return (0..n).map(|i| Edit { op: EditOp::Delete, old_index: i, new_index: 0 }).collect();
    }

    let max = n + m;
    let offset = max as isize;
    let size = 2 * max + 1;
    let mut trace: Vec<Vec<isize>> = Vec::new();
    let mut v = vec![0isize; size];

    'outer: for d in 0..=max as isize {
        trace.push(v.clone());
        for k in (-d..=d).step_by(2) {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while (x as usize) < n && (y as usize) < m && old[x as usize] == new[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;

            if x as usize >= n && y as usize >= m {
                break 'outer;
            }
        }
    }

    backtrack(&trace, n, m, offset)
}

fn backtrack(trace: &[Vec<isize>], n: usize, m: usize, offset: isize) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut x = n as isize;
    let mut y = m as isize;

    for d in (0..trace.len()).rev() {
        let v = &trace[d];
        let k = x - y;
        let idx = (k + offset) as usize;

        let prev_k = if k == -(d as isize) || (k != d as isize && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_idx = (prev_k + offset) as usize;
        let prev_x = v[prev_idx];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(Edit { op: EditOp::Equal, old_index: (x - 1) as usize, new_index: (y - 1) as usize });
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                edits.push(Edit { op: EditOp::Insert, old_index: x as usize, new_index: (y - 1) as usize });
            } else {
                edits.push(Edit { op: EditOp::Delete, old_index: (x - 1) as usize, new_index: y as usize });
            }
        }

        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Addition,
    Deletion,
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }

    /// Closed-interval overlap of this hunk's old-side range with another's.
    pub fn conflicts_with(&self, other: &Hunk) -> bool {
        let end_a = self.old_start + self.old_count.saturating_sub(1);
        let end_b = other.old_start + other.old_count.saturating_sub(1);
        !(end_a < other.old_start || end_b < self.old_start)
    }
}

/// Split an edit script into unified-diff hunks with `context` lines of surrounding equality.
fn hunks_from_edits(old: &[&str], new: &[&str], edits: &[Edit], context: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut i = 0;
    while i < edits.len() {
        if edits[i].op == EditOp::Equal {
            i += 1;
            continue;
        }
        // Found a change; walk backward to include leading context, forward to the end of
        // this change cluster (allowing up to `2*context` equal lines to bridge hunks).
        let mut start = i;
        while start > 0 && edits[start - 1].op == EditOp::Equal && i - start < context {
            start -= 1;
        }
        let mut end = i;
        while end < edits.len() {
            if edits[end].op != EditOp::Equal {
                end += 1;
                continue;
            }
            // Count the run of equal edits here; if it's short enough to bridge, keep going.
            let run_start = end;
            while end < edits.len() && edits[end].op == EditOp::Equal {
                end += 1;
            }
            let run_len = end - run_start;
            if run_len > 2 * context || end == edits.len() {
                end = run_start + context.min(run_len);
                break;
            }
        }

        let slice = &edits[start..end];
        let lines: Vec<DiffLine> = slice
            .iter()
            .map(|e| match e.op {
                EditOp::Equal => DiffLine { tag: LineTag::Context, text: old[e.old_index].to_string() },
                EditOp::Delete => DiffLine { tag: LineTag::Deletion, text: old[e.old_index].to_string() },
                EditOp::Insert => DiffLine { tag: LineTag::Addition, text: new[e.new_index].to_string() },
            })
            .collect();

        let old_count = slice.iter().filter(|e| e.op != EditOp::Insert).count();
        let new_count = slice.iter().filter(|e| e.op != EditOp::Delete).count();
        let old_start = slice
            .iter()
            .find(|e| e.op != EditOp::Insert)
            .map(|e| e.old_index + 1)
            .unwrap_or(0);
        let new_start = slice
            .iter()
            .find(|e| e.op != EditOp::Delete)
            .map(|e| e.new_index + 1)
            .unwrap_or(0);

        hunks.push(Hunk { old_start, old_count, new_start, new_count, lines });
        i = end;
    }
    hunks
}

pub fn diff_lines(old_text: &str, new_text: &str, context: usize) -> Vec<Hunk> {
    let old: Vec<&str> = split_lines(old_text);
    let new: Vec<&str> = split_lines(new_text);
    let edits = myers_diff(&old, &new);
    hunks_from_edits(&old, &new, &edits, context)
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split_inclusive('\n').collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: String,
    pub status: FileStatus,
    pub old_oid: Option<String>,
    pub new_oid: Option<String>,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn conflicts_with(&self, other: &FileDiff) -> bool {
        self.path == other.path
            && self.hunks.iter().any(|a| other.hunks.iter().any(|b| a.conflicts_with(b)))
    }
}

fn diff_blobs(store: &Store, path: &str, old_oid: Option<&str>, new_oid: Option<&str>, context: usize) -> Result<FileDiff> {
    let old_text = match old_oid {
        Some(oid) => store.get_text(oid).unwrap_or_default(),
        None => String::new(),
    };
    let new_text = match new_oid {
        Some(oid) => store.get_text(oid).unwrap_or_default(),
        None => String::new(),
    };
    let status = match (old_oid, new_oid) {
        (None, Some(_)) => FileStatus::Added,
        (Some(_), None) => FileStatus::Deleted,
        _ => FileStatus::Modified,
    };
    let hunks = diff_lines(&old_text, &new_text, context);
    Ok(FileDiff {
        path: path.to_string(),
        status,
        old_oid: old_oid.map(str::to_string),
        new_oid: new_oid.map(str::to_string),
        hunks,
    })
}

/// Diff two blobs directly by oid, used by the merge engine at zero context.
pub fn blob_vs_blob(store: &Store, path: &str, base_oid: &str, other_oid: &str, context: usize) -> Result<FileDiff> {
    diff_blobs(store, path, Some(base_oid), Some(other_oid), context)
}

/// Unstaged diff: index contents vs. current worktree contents. New worktree-only files are
/// untracked, not diffed; a worktree file absent relative to the index is reported deleted.
pub fn index_vs_worktree(
    store: &Store,
    index: &BTreeMap<String, String>,
    worktree: &BTreeMap<String, String>,
) -> Result<Vec<FileDiff>> {
    let mut out = Vec::new();
    for (path, index_oid) in index {
        match worktree.get(path) {
            Some(wt_oid) if wt_oid != index_oid => {
                out.push(diff_blobs(store, path, Some(index_oid), Some(wt_oid), 3)?);
            }
            None => {
                out.push(diff_blobs(store, path, Some(index_oid), None, 3)?);
            }
            _ => {}
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Staged diff: HEAD's tree vs. the index, including additions.
pub fn head_vs_index(
    store: &Store,
    head: &BTreeMap<String, String>,
    index: &BTreeMap<String, String>,
) -> Result<Vec<FileDiff>> {
    let mut out = Vec::new();
    let mut paths: Vec<&String> = head.keys().chain(index.keys()).collect();
    paths.sort();
    paths.dedup();

    for path in paths {
        let head_oid = head.get(path);
        let index_oid = index.get(path);
        if head_oid == index_oid {
            continue;
        }
        out.push(diff_blobs(store, path, head_oid.map(String::as_str), index_oid.map(String::as_str), 3)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn identical_text_has_no_hunks() {
        let hunks = diff_lines("a\nb\nc\n", "a\nb\nc\n", 3);
        assert!(hunks.is_empty());
    }

    #[test]
    fn single_line_change_produces_one_hunk() {
        let hunks = diff_lines("a\nb\nc\n", "a\nx\nc\n", 3);
        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert!(hunk.lines.iter().any(|l| l.tag == LineTag::Deletion && l.text == "b\n"));
        assert!(hunk.lines.iter().any(|l| l.tag == LineTag::Addition && l.text == "x\n"));
    }

    #[test]
    fn insertion_at_end() {
        let hunks = diff_lines("a\nb\n", "a\nb\nc\n", 3);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].lines.iter().any(|l| l.tag == LineTag::Addition && l.text == "c\n"));
    }

    #[test]
    fn deletion_from_middle() {
        let hunks = diff_lines("a\nb\nc\nd\n", "a\nc\nd\n", 3);
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].lines.iter().any(|l| l.tag == LineTag::Deletion && l.text == "b\n"));
    }

    #[test]
    fn empty_old_is_all_additions() {
        let hunks = diff_lines("", "a\nb\n", 3);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_start, 0);
        assert_eq!(hunks[0].new_count, 2);
    }

    #[test]
    fn non_overlapping_hunks_do_not_conflict() {
        let base = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let ours = "X\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let theirs = "1\n2\n3\n4\n5\n6\n7\n8\n9\nY\n";
        let a = diff_lines(base, ours, 0);
        let b = diff_lines(base, theirs, 0);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!(!a[0].conflicts_with(&b[0]));
    }

    #[test]
    fn overlapping_hunks_conflict() {
        let base = "1\n2\n3\n";
        let ours = "one\n2\n3\n";
        let theirs = "uno\n2\n3\n";
        let a = diff_lines(base, ours, 0);
        let b = diff_lines(base, theirs, 0);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!(a[0].conflicts_with(&b[0]));
    }

    #[test]
    fn index_vs_worktree_reports_modified_and_deleted_but_not_untracked() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let a = store.put(b"a1\n").unwrap();
        let a2 = store.put(b"a2\n").unwrap();
        let c = store.put(b"c1\n").unwrap();

        let mut index = BTreeMap::new();
        index.insert("a.txt".to_string(), a.clone());
        index.insert("b.txt".to_string(), c.clone());

        let mut worktree = BTreeMap::new();
        worktree.insert("a.txt".to_string(), a2.clone());
        worktree.insert("new.txt".to_string(), c);

        let diffs = index_vs_worktree(&store, &index, &worktree).unwrap();
        let paths: Vec<&str> = diffs.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"a.txt"));
        assert!(paths.contains(&"b.txt"));
        assert!(!paths.contains(&"new.txt"));
        assert_eq!(diffs.iter().find(|d| d.path == "b.txt").unwrap().status, FileStatus::Deleted);
    }
}
