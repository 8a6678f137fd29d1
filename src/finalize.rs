//! Finalize Module for the pyx Compiler
//!
//! Assembles the text written next to each source: the import prelude that
//! brings `Element` and `Fragment` into scope, then the compiled module.

use std::fs;
use std::path::Path;

use crate::error::DriverError;

pub fn finalize_output(compiled: &str, prelude: &str) -> String {
    if prelude.is_empty() {
        return compiled.to_string();
    }
    let mut out = String::with_capacity(prelude.len() + 1 + compiled.len());
    out.push_str(prelude);
    out.push('\n');
    out.push_str(compiled);
    out
}

pub fn write_output(path: &Path, contents: &str) -> Result<(), DriverError> {
    fs::write(path, contents).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}
