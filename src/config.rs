//! # Configuration
//!
//! INI-style `section.key = value` persistence mirroring the original implementation's use of
//! Python's `configparser`: local config at `.bit/config` shadows global config at
//! `~/.bitconfig`. The only keys the core reads are `user.name` / `user.email`, consulted when
//! building a commit's author/committer line.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Default, Clone)]
pub struct Config {
    // section -> (key -> value)
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current = String::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                current = line[1..line.len() - 1].trim().to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for (section, values) in &self.sections {
            out.push_str(&format!("[{section}]\n"));
            for (key, value) in values {
                out.push_str(&format!("\t{key} = {value}\n"));
            }
        }
        fs::write(path, out)?;
        Ok(())
    }
}

/// Resolve `user.name`/`user.email`, preferring local over global config, then falling back
/// to `GIT_AUTHOR_NAME`/`GIT_AUTHOR_EMAIL`, then a fixed default identity.
pub fn author_identity(local_path: &Path, global_path: &Path) -> Result<(String, String)> {
    let local = Config::load(local_path)?;
    let global = Config::load(global_path)?;

    let name = local
        .get("user", "name")
        .or_else(|| global.get("user", "name"))
        .map(str::to_string)
        .or_else(|| env::var("GIT_AUTHOR_NAME").ok())
        .unwrap_or_else(|| "Unknown".to_string());

    let email = local
        .get("user", "email")
        .or_else(|| global.get("user", "email"))
        .map(str::to_string)
        .or_else(|| env::var("GIT_AUTHOR_EMAIL").ok())
        .unwrap_or_else(|| "unknown@example.com".to_string());

    Ok((name, email))
}

pub fn global_config_path() -> PathBuf {
    dirs_home().join(".bitconfig")
}

fn dirs_home() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        let mut config = Config::default();
        config.set("user", "name", "Ada");
        config.set("user", "email", "ada@example.com");
        config.write(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.get("user", "name"), Some("Ada"));
        assert_eq!(loaded.get("user", "email"), Some("ada@example.com"));
    }

    #[test]
    fn local_overrides_global() {
        let dir = tempdir().unwrap();
        let local_path = dir.path().join("local");
        let global_path = dir.path().join("global");

        let mut global = Config::default();
        global.set("user", "name", "Global Person");
        global.set("user", "email", "global@example.com");
        global.write(&global_path).unwrap();

        let mut local = Config::default();
        local.set("user", "name", "Local Person");
        local.write(&local_path).unwrap();

        let (name, email) = author_identity(&local_path, &global_path).unwrap();
        assert_eq!(name, "Local Person");
        assert_eq!(email, "global@example.com");
    }

    #[test]
    fn missing_files_fall_back_to_default() {
        let dir = tempdir().unwrap();
        let (name, _email) = author_identity(&dir.path().join("none1"), &dir.path().join("none2")).unwrap();
        assert!(!name.is_empty());
    }
}
