//! # Rm command
//!
//! Remove a tracked path from the index and the worktree.
//!
//! ## Usage
//!
//! ```bash
//! bit rm path/to/file
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(path: &str) -> Result<()> {
    let repo = Repository::find()?;
    repo.rm(path)?;
    println!("rm '{path}'");
    Ok(())
}
