//! Per-file and per-tree compilation on top of the rewrite loop.
//!
//! Files are independent: each one is read, compiled and written on its own,
//! so a directory is processed with a rayon parallel iterator and the only
//! shared state is the read-only compiler and cache.

use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::cache::IncrementalCache;
use crate::discovery::{discover_sources, output_path};
use crate::error::DriverError;
use crate::finalize::{finalize_output, write_output};
use crate::transform::{CompileOptions, Compiler};

pub fn load_options(path: &Path) -> Result<CompileOptions, DriverError> {
    let data = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub compiled: Vec<PathBuf>,
    /// Paths that failed, with the rendered error.
    pub failed: Vec<(PathBuf, String)>,
}

impl BuildSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Driver {
    compiler: Compiler,
    cache: Option<IncrementalCache>,
}

impl Driver {
    pub fn new(options: CompileOptions) -> Result<Self, DriverError> {
        let cache = match &options.cache_dir {
            Some(dir) => {
                let fingerprint = serde_json::to_string(&options).map_err(|source| {
                    DriverError::Json {
                        path: dir.clone(),
                        source,
                    }
                })?;
                Some(IncrementalCache::new(dir, &fingerprint)?)
            }
            None => None,
        };
        Ok(Self {
            compiler: Compiler::new(options),
            cache,
        })
    }

    pub fn options(&self) -> &CompileOptions {
        self.compiler.options()
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Finalized output for one source file, without writing it.
    pub fn compile_file(&self, path: &Path) -> Result<String, DriverError> {
        let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(output) = self.cache.as_ref().and_then(|c| c.get(path, &source)) {
            return Ok(output);
        }

        let file = path.to_string_lossy();
        let result = self.compiler.compile(&source, &file)?;
        let output = finalize_output(&result.code, &self.options().prelude);

        if let Some(cache) = &self.cache {
            cache.set(path, &source, &output)?;
        }
        Ok(output)
    }

    /// Compiles `path` and writes the sibling output file.
    pub fn build_file(&self, path: &Path) -> Result<PathBuf, DriverError> {
        let output = self.compile_file(path)?;
        let target = output_path(path, &self.options().output_extension);
        write_output(&target, &output)?;
        info!(source = %path.display(), output = %target.display(), "compiled");
        Ok(target)
    }

    /// Builds every source under `root`. One file failing does not stop the rest.
    pub fn build_path(&self, root: &Path) -> Result<BuildSummary, DriverError> {
        let files = discover_sources(root, &self.options().input_extension)?;
        info!(root = %root.display(), files = files.len(), "discovered sources");

        let results: Vec<(PathBuf, Result<PathBuf, DriverError>)> = files
            .par_iter()
            .map(|file| (file.clone(), self.build_file(file)))
            .collect();

        let mut summary = BuildSummary::default();
        for (file, result) in results {
            match result {
                Ok(_) => summary.compiled.push(file),
                Err(e) => {
                    error!(source = %file.display(), "{}", e);
                    summary.failed.push((file, e.to_string()));
                }
            }
        }
        Ok(summary)
    }
}
