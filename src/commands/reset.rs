//! # Reset command
//!
//! Move the current branch to a target commit, with three levels of reach into the index and
//! worktree.
//!
//! ## Usage
//!
//! ```bash
//! bit reset HEAD~0
//! bit reset --hard <commit>
//! ```

use anyhow::Result;

use crate::{Repository, ResetMode};

pub fn run(target: &str, mode: ResetMode) -> Result<()> {
    let repo = Repository::find()?;
    repo.reset(target, mode)?;
    Ok(())
}
