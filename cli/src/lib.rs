use std::path::Path;

use anyhow::{Result, bail};
use whisper_endpoints_core::Settings;

pub mod check;
pub mod list;
pub mod probe;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Load settings from `path`, or from the per-user settings file.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_path(path),
        None => Settings::load(),
    }
}

/// Write default settings to `path` (or the per-user file). Refuses to replace an existing file unless `force`.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<std::path::PathBuf> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Settings::default_path()?,
    };
    if target.exists() && !force {
        bail!("[{}] already exists, use --force to overwrite", target.display());
    }
    match path {
        Some(_) => Settings::default().store_path(&target)?,
        None => Settings::default().store()?,
    }
    Ok(target)
}
