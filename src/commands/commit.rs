//! # Commit command
//!
//! Freeze the current index into a new commit.
//!
//! ## Usage
//!
//! ```bash
//! bit commit -m "message"
//! ```

use anyhow::Result;

use crate::Repository;

pub fn run(message: &str) -> Result<()> {
    let repo = Repository::find()?;
    let oid = repo.commit(message)?;
    println!("[{}] {}", &oid[..7], message);
    Ok(())
}
