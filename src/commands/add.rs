//! # Add command
//!
//! Stage worktree paths into the index. `.` stages the union of every worktree file and every
//! currently tracked path, so deletions are picked up too.
//!
//! ## Usage
//!
//! ```bash
//! bit add file.txt
//! bit add file1.txt file2.txt
//! bit add .
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(paths: Vec<String>) -> Result<()> {
    let repo = Repository::find()?;

    let changed = if paths.iter().any(|p| p == ".") {
        repo.add_all()?
    } else {
        repo.add(&paths)?
    };

    println!("{changed} path(s) staged");
    Ok(())
}
