//! # Error taxonomy
//!
//! The engine layer returns precise, typed failures so the CLI layer can translate each one
//! into a single diagnostic line and an exit code without guessing at intent. Higher layers
//! (the `commands` modules, `main.rs`) wrap these in `anyhow::Result` for convenient
//! `.context(...)` chaining; this enum is what they match on to decide *what* to say.

use std::path::PathBuf;
use thiserror::Error;

use crate::diff::FileDiff;

/// Everything that can go wrong inside the engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a bit repository: {0}")]
    NotARepo(PathBuf),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("working tree is not clean: {0}")]
    Unclean(String),

    #[error("no changes: {0}")]
    NoChanges(String),

    #[error("merge conflict")]
    MergeConflict {
        modify: Vec<FileDiff>,
        delete: Vec<String>,
    },

    #[error("corrupt object: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
