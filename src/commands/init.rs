//! # Init command
//!
//! Create the `.bit` directory structure in the current (or a given) directory.
//!
//! ## Usage
//!
//! ```bash
//! bit init
//! bit init /path/to/repo
//! ```

use std::path::Path;

use anyhow::Result;

use crate::Repository;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target = path.unwrap_or(Path::new("."));
    std::fs::create_dir_all(target)?;
    let repo = Repository::init(target)?;
    println!("Initialized empty bit repository in {}", repo.bit_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_bit_directory_structure() {
        let temp = tempdir().unwrap();
        run(Some(temp.path())).unwrap();

        assert!(temp.path().join(".bit").exists());
        assert!(temp.path().join(".bit/objects").exists());
        assert!(temp.path().join(".bit/refs/heads").exists());

        let head = std::fs::read_to_string(temp.path().join(".bit/HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/master\n");
    }

    #[test]
    fn rejects_existing_repo() {
        let temp = tempdir().unwrap();
        run(Some(temp.path())).unwrap();
        assert!(run(Some(temp.path())).is_err());
    }
}
