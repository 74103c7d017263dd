//! # Config command
//!
//! Read or write an INI-style `section.key` value, local (`.bit/config`) unless `--global` is
//! given (`~/.bitconfig`).
//!
//! ## Usage
//!
//! ```bash
//! bit config user.name "Ada Lovelace"
//! bit config --global user.email ada@example.com
//! bit config user.name
//! ```

use anyhow::{bail, Result};

use crate::config::{self, Config};
use crate::Repository;

pub fn run(global: bool, key_path: &str, value: Option<String>) -> Result<()> {
    let Some((section, key)) = key_path.split_once('.') else {
        bail!("key must be in 'section.key' format");
    };

    let path = if global {
        config::global_config_path()
    } else {
        Repository::find()?.bit_dir.join("config")
    };

    match value {
        Some(value) => {
            let mut cfg = Config::load(&path)?;
            cfg.set(section, key, &value);
            cfg.write(&path)?;
        }
        None => {
            let cfg = Config::load(&path)?;
            if let Some(value) = cfg.get(section, key) {
                println!("{value}");
            }
        }
    }
    Ok(())
}
