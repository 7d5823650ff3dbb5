//! Persists rendered declaration text.

use std::path::Path;

use crate::error::{Error, Result};

/// Write `text` to `path`, creating missing parent directories.
pub fn write_declarations(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}
