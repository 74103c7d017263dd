//! # Log command
//!
//! Display HEAD's first-parent commit history, newest first.
//!
//! ## Usage
//!
//! ```bash
//! bit log
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run() -> Result<()> {
    let repo = Repository::find()?;

    for entry in repo.log()? {
        let mut refs = Vec::new();
        if entry.current_branch.as_ref().map(|b| entry.branches.contains(b)).unwrap_or(false) {
            refs.push(format!("HEAD -> {}", entry.current_branch.as_ref().unwrap()));
        }
        for branch in &entry.branches {
            if Some(branch) != entry.current_branch.as_ref() {
                refs.push(branch.clone());
            }
        }
        let decoration = if refs.is_empty() { String::new() } else { format!(" ({})", refs.join(", ")) };

        println!("commit {}{decoration}", entry.oid);
        println!(
            "Author: {} <{}>",
            entry.commit.author.name, entry.commit.author.email
        );
        println!("Date:   {}", entry.commit.author.timestamp);
        println!();
        for line in entry.commit.message.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}
