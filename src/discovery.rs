//! Discovery Module for the pyx Compiler
//!
//! Recursively scans a directory for markup sources. A path naming a file is
//! returned as-is, whatever its extension.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::DriverError;

/// Every file under `root` whose extension is `extension`, sorted by path.
pub fn discover_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>, DriverError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| DriverError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && has_extension(path, extension) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map(|ext| ext == extension).unwrap_or(false)
}

/// The sibling file a source compiles to: same directory, same base name.
pub fn output_path(source: &Path, output_extension: &str) -> PathBuf {
    source.with_extension(output_extension)
}
