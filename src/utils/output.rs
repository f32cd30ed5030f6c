use std::{io, path::Path};

use anyhow::{Context, Result};
use tracing::debug;

/// Writes a finished document to `path`, creating missing parent directories first.
///
/// The document is written with a single call once it is fully built, so a failure while
/// rendering never leaves a truncated file behind.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        match std::fs::create_dir_all(parent) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create directory {parent:?}"))
            }
        }
    }

    debug!("Writing {} bytes into {path:?}", contents.len());
    std::fs::write(path, contents).with_context(|| format!("Failed to write {path:?}"))
}
