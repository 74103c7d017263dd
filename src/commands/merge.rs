//! # Merge command
//!
//! Three-way merge another branch into HEAD. Conflicts print the conflicting paths and leave
//! HEAD, the index, and the worktree untouched.
//!
//! ## Usage
//!
//! ```bash
//! bit merge feature
//! ```

use anyhow::Result;

use crate::error::Error;
use crate::{MergeResult, Repository};

pub fn run(branch: &str) -> Result<()> {
    let repo = Repository::find()?;
    match repo.merge(branch) {
        Ok(MergeResult::AlreadyUpToDate) => println!("Already up to date."),
        Ok(MergeResult::FastForward(oid)) => println!("Fast-forward to {}", &oid[..7]),
        Ok(MergeResult::Merged(oid)) => println!("Merge made ({})", &oid[..7]),
        Err(Error::MergeConflict { modify, delete }) => {
            println!("Automatic merge failed; fix conflicts and then commit the result.");
            for file_diff in &modify {
                println!("CONFLICT (content): Merge conflict in {}", file_diff.path);
            }
            for path in &delete {
                println!("CONFLICT (modify/delete): {path} deleted in one branch, modified in the other.");
            }
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}
