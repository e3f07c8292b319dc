//! File system-related utilities.

use std::fs::create_dir_all;
use std::path::Path;

use eyre::Result;
use log::debug;

use crate::Error;

/// Creates the parent directory of the given path, if it does not exist.
pub(crate) fn ensure_parent_path_exists(path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::PathMissingParent(path.to_path_buf()))?;
    ensure_path_exists(parent)
}

pub(crate) fn ensure_path_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        create_dir_all(path).map_err(|e| Error::Io(path.display().to_string(), e))?;
        debug!("Created path: {}", path.display());
    }
    Ok(())
}
