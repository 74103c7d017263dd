//! # Checkout command
//!
//! Switch to another branch, reconciling the index and worktree to its tip commit.
//!
//! ## Usage
//!
//! ```bash
//! bit checkout feature
//! bit checkout --force feature
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(name: &str, force: bool) -> Result<()> {
    let repo = Repository::find()?;
    repo.checkout(name, force)?;
    println!("Switched to branch '{name}'");
    Ok(())
}
