//! # Branch command
//!
//! List branches, or create a new one pointing at HEAD.
//!
//! ## Usage
//!
//! ```bash
//! bit branch
//! bit branch feature
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(name: Option<String>) -> Result<()> {
    let repo = Repository::find()?;

    match name {
        Some(name) => {
            repo.branch(&name)?;
            println!("Created branch '{name}'");
        }
        None => {
            let current = repo.current_branch()?;
            for branch in repo.list_branches()? {
                let marker = if Some(&branch) == current.as_ref() { "*" } else { " " };
                println!("{marker} {branch}");
            }
        }
    }
    Ok(())
}
