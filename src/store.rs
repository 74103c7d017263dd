//! # Object store
//!
//! Content-addressed storage for blobs, trees, and commits. An object's identity is the hex
//! SHA-1 digest of its raw payload bytes; there is no header, no type tag, and no compression
//! in the stored file. Objects live flat under `objects/<oid>` — no two-character fan-out
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// The object store rooted at a repository's `.bit/objects` directory.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Compute the oid of a payload without writing anything.
    pub fn hash(content: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    /// Store a payload, returning its oid. Idempotent: writing the same bytes twice is a
    /// no-op on the second call.
    pub fn put(&self, content: &[u8]) -> Result<String> {
        let oid = Self::hash(content);
        let path = self.dir.join(&oid);
        if !path.exists() {
            fs::write(&path, content)?;
        }
        Ok(oid)
    }

    /// Read an object's raw payload back out.
    pub fn get(&self, oid: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(oid);
        fs::read(&path).map_err(|_| Error::NotFound(format!("object {oid}")))
    }

    /// Read an object's payload as UTF-8 text, failing with `Corrupt` if it isn't valid.
    pub fn get_text(&self, oid: &str) -> Result<String> {
        let bytes = self.get(oid)?;
        String::from_utf8(bytes).map_err(|_| Error::Corrupt(format!("object {oid} is not valid utf-8")))
    }

    pub fn exists(&self, oid: &str) -> bool {
        self.dir.join(oid).exists()
    }

    fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_is_content_addressed_and_idempotent() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());

        let oid1 = store.put(b"hello world").unwrap();
        let oid2 = store.put(b"hello world").unwrap();
        assert_eq!(oid1, oid2);
        assert_eq!(oid1, Store::hash(b"hello world"));

        let entries: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn round_trips_raw_bytes() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        let oid = store.put(b"some payload\nwith lines\n").unwrap();
        assert_eq!(store.get(&oid).unwrap(), b"some payload\nwith lines\n");
    }

    #[test]
    fn missing_object_is_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        assert!(store.get("0000000000000000000000000000000000000a").is_err());
    }
}
