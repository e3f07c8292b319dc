//! Static asset copying.

use std::fs;
use std::path::Path;

use eyre::Result;
use log::info;

use crate::fs::ensure_parent_path_exists;
use crate::Error;

/// Copies every regular file under the static root into the site root,
/// byte-for-byte, preserving relative paths. Returns the number of files
/// copied.
pub fn copy_static<P1, P2>(static_root: P1, site_root: P2) -> Result<u64>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let static_root = static_root.as_ref();
    let site_root = site_root.as_ref();
    let pattern = static_root.join("**").join("*");
    let mut copied = 0_u64;
    for entry in glob::glob(&pattern.to_string_lossy()).map_err(Error::WalkPattern)? {
        let path = entry.map_err(Error::Walk)?;
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(static_root).unwrap_or(&path);
        let destination = site_root.join(relative);
        ensure_parent_path_exists(&destination)?;
        fs::copy(&path, &destination).map_err(|e| Error::AssetCopy(path.clone(), e))?;
        info!("Copied static file to: {}", destination.display());
        copied += 1;
    }
    Ok(copied)
}
