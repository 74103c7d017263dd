//! # Stash command
//!
//! Push the current changes onto the stash stack, pop the top entry back in, or list the
//! stack.
//!
//! ## Usage
//!
//! ```bash
//! bit stash push "message"
//! bit stash pop
//! bit stash list
//! ```

use anyhow::Result;

use crate::Repository;

pub fn push(message: Option<String>) -> Result<()> {
    let repo = Repository::find()?;
    repo.stash_push(message.as_deref())?;
    println!("Saved working directory and index state WIP");
    Ok(())
}

pub fn pop() -> Result<()> {
    let repo = Repository::find()?;
    repo.stash_pop()?;
    println!("Dropped stash entry");
    Ok(())
}

pub fn list() -> Result<()> {
    let repo = Repository::find()?;
    let entries = repo.stash_list()?;
    if entries.is_empty() {
        println!("No stashes found.");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("stash@{{{i}}}: {} {}", &entry.oid[..7], entry.commit.message);
    }
    Ok(())
}
