//! # Object types
//!
//! Blobs, trees, and commits are variants of one underlying idea: a payload of bytes with an
//! identity assigned by the object store (`crate::store`). They share no common base type
//! beyond that; each has its own serialization.
//!
//! ### Blob
//! Raw file contents, stored and addressed exactly as given — no framing.
//!
//! ### Tree
//! A directory snapshot: lines of `"<kind> <oid> <name>"`, sorted by name. See `tree.rs`.
//!
//! ### Commit
//! A header block (`tree`, zero or more `parent`, `author`, `committer`) followed by a blank
//! line and a free-form message. See `commit.rs`.

pub mod commit;
pub mod tree;

pub use commit::Commit;
pub use tree::{Kind, Tree, TreeEntry};
