//! # Stash
//!
//! Layered entirely on the merge engine and the object store. `push` snapshots the worktree
//! into a commit parented on HEAD (and, if one exists, the previous stash entry, threading a
//! stack through the second-parent chain) and then hard-resets to HEAD. `pop` three-ways the
//! stash commit against current HEAD, using the stash's own first parent as the merge base
//! override, and on success advances `refs/stash` to the popped entry's second parent (or
//! clears it if the stack is now empty). Grounded on the original implementation's `stash`
//! module and `commands/stash.py`.

use crate::error::Result;
use crate::merge::MergeOutcome;
use crate::objects::Commit;
use crate::store::Store;
use crate::tree_builder;

/// One entry in the stash stack, read back from its commit object.
pub struct StashEntry {
    pub oid: String,
    pub commit: Commit,
}

/// Walk the stack via the second-parent chain, most recent first.
pub fn list(store: &Store, top: Option<&str>) -> Result<Vec<StashEntry>> {
    let mut out = Vec::new();
    let mut current = top.map(str::to_string);
    while let Some(oid) = current {
        let commit = tree_builder::read_commit(store, &oid)?;
        current = commit.parents.get(1).cloned();
        out.push(StashEntry { oid, commit });
    }
    Ok(out)
}

/// Attempt to pop the top of the stash: three-way merge the stash commit against `head_oid`,
/// using the stash's recorded pre-stash state (its first parent) as the merge base. Returns
/// the merge outcome plus the oid the stash ref should advance to afterward (the popped
/// entry's second parent, or `None` if the stack is now empty).
pub fn pop(store: &Store, stash_oid: &str, head_oid: &str) -> Result<(MergeOutcome, Option<String>)> {
    let stash_commit = tree_builder::read_commit(store, stash_oid)?;
    let base_oid = stash_commit
        .parents
        .first()
        .cloned()
        .unwrap_or_else(|| head_oid.to_string());

    let base_map = tree_builder::walk_commit(store, Some(&base_oid))?;
    let head_map = tree_builder::walk_commit(store, Some(head_oid))?;
    let stash_map = tree_builder::walk_commit(store, Some(stash_oid))?;

    let outcome = crate::merge::three_way_with_maps(store, head_oid, stash_oid, &base_map, &head_map, &stash_map)?;
    let next_stash = stash_commit.parents.get(1).cloned();
    Ok((outcome, next_stash))
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
    fn list_walks_second_parent_chain() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());

        let head = commit(&store, "t0", vec![]);
        let stash1 = commit(&store, "t1", vec![head.clone()]);
        let stash2 = commit(&store, "t2", vec![head.clone(), stash1.clone()]);

        let entries = list(&store, Some(&stash2)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].oid, stash2);
        assert_eq!(entries[1].oid, stash1);
    }

    #[test]
    fn empty_stack_yields_no_entries() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        assert!(list(&store, None).unwrap().is_empty());
    }
}
