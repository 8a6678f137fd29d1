use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use crate::error::DriverError;

#[derive(Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub output: String,
}

pub struct IncrementalCache {
    cache_dir: PathBuf,
    /// Mixed into every hash so changed options invalidate old entries.
    fingerprint: String,
}

impl IncrementalCache {
    pub fn new(cache_dir: impl Into<PathBuf>, fingerprint: &str) -> Result<Self, DriverError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|source| DriverError::Io {
            path: cache_dir.clone(),
            source,
        })?;
        Ok(Self {
            cache_dir,
            fingerprint: fingerprint.to_string(),
        })
    }

    pub fn compute_hash(&self, source: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.fingerprint.as_bytes());
        hasher.update([0u8]);
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn get_cache_path(&self, file_path: &Path) -> PathBuf {
        let safe_name = file_path
            .to_string_lossy()
            .replace('/', "_")
            .replace('\\', "_")
            .replace(':', "_");
        self.cache_dir.join(format!("{}.json", safe_name))
    }

    pub fn get(&self, file_path: &Path, source: &str) -> Option<String> {
        let cache_path = self.get_cache_path(file_path);
        let data = fs::read_to_string(&cache_path).ok()?;

        let entry: CacheEntry = match serde_json::from_str(&data) {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    file = %file_path.display(),
                    "cache entry is corrupt, discarding it: {}",
                    e
                );
                fs::remove_file(cache_path).ok();
                return None;
            }
        };

        if entry.hash == self.compute_hash(source) {
            trace!(file = %file_path.display(), "cache hit");
            Some(entry.output)
        } else {
            None
        }
    }

    pub fn set(&self, file_path: &Path, source: &str, output: &str) -> Result<(), DriverError> {
        let cache_path = self.get_cache_path(file_path);
        let entry = CacheEntry {
            hash: self.compute_hash(source),
            output: output.to_string(),
        };

        let data = serde_json::to_string(&entry).map_err(|source| DriverError::Json {
            path: cache_path.clone(),
            source,
        })?;
        fs::write(&cache_path, data).map_err(|source| DriverError::Io {
            path: cache_path,
            source,
        })
    }
}
