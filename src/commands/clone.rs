//! # Clone command
//!
//! Copy another repository's `.bit` directory and check out its current branch.
//! Local-filesystem only — this design has no network transport.
//!
//! ## Usage
//!
//! ```bash
//! bit clone /path/to/source
//! bit clone /path/to/source /path/to/dest
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::Repository;

pub fn run(src: &str, dst: Option<String>) -> Result<()> {
    let src_path = Path::new(src);
    let dst_path = match dst {
        Some(d) => PathBuf::from(d),
        None => PathBuf::from(
            src_path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("cannot infer destination name from '{src}'"))?,
        ),
    };

    println!("Cloning into '{}'...", dst_path.display());
    Repository::clone_from(src_path, &dst_path)?;
    println!("Done.");
    Ok(())
}
