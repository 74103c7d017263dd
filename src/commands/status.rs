//! # Status command
//!
//! Show staged, unstaged, and untracked paths, derived from the (HEAD, index, worktree)
//! triple.
//!
//! ## Usage
//!
//! ```bash
//! bit status
//! ```

use anyhow::Result;

use crate::{Repository, StatusKind};

pub fn run() -> Result<()> {
    let repo = Repository::find()?;
    let status = repo.status()?;

    if status.is_clean() {
        println!("nothing to commit, working tree clean");
        return Ok(());
    }

    if !status.staged.is_empty() {
        println!("Changes to be committed:");
        for (path, kind) in &status.staged {
            println!("\t{}: {path}", label(*kind, true));
        }
        println!();
    }

    if !status.unstaged.is_empty() {
        println!("Changes not staged for commit:");
        for (path, kind) in &status.unstaged {
            println!("\t{}: {path}", label(*kind, false));
        }
        println!();
    }

    if !status.untracked.is_empty() {
        println!("Untracked files:");
        for path in &status.untracked {
            println!("\t{path}");
        }
        println!();
    }

    Ok(())
}

fn label(kind: StatusKind, staged: bool) -> &'static str {
    match (kind, staged) {
        (StatusKind::New, _) => "new file",
        (StatusKind::Modified, _) => "modified",
        (StatusKind::Deleted, _) => "deleted",
    }
}
