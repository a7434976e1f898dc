//! Configuration loading and assets root resolution

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Assets root resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Compiled default (`./assets`, relative to the working directory)
pub fn resolve_assets_root(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    if let Some(path) = cli_arg {
        debug!("assets root from command line: {}", path.display());
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        debug!("assets root from {}: {}", env_var_name, path);
        return PathBuf::from(path);
    }

    debug!("assets root defaulted to ./assets");
    PathBuf::from("assets")
}

/// Load and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("loading {}", path.display());
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_toml(&raw)
}

/// Deserialize TOML from an in-memory string
///
/// Used for the embedded default content catalogue.
pub fn parse_toml<T: DeserializeOwned>(raw: &str) -> Result<T> {
    toml::from_str(raw).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))
}
