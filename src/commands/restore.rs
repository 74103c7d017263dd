//! # Restore command
//!
//! Restore index entries from HEAD (`--staged`), or worktree files from the index.
//!
//! ## Usage
//!
//! ```bash
//! bit restore --staged file.txt
//! bit restore file.txt
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(paths: Vec<String>, staged: bool) -> Result<()> {
    let repo = Repository::find()?;
    repo.restore(&paths, staged)?;
    Ok(())
}
