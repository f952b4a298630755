//! Subcommand implementations.

pub mod init;
pub mod search;
pub mod serve;
pub mod stats;

use anyhow::Result;
use std::path::Path;

use crate::Config;

/// Load the config from an explicit path, or from `root` when none is given.
pub fn load_config(path: Option<&Path>, root: &Path) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(root),
    }
}
