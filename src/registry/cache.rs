//! Disk cache for release metadata
//!
//! One JSON file per package under the cache root; the file's modification
//! time is the freshness signal. Scoped packages (`@scope/name`) map to a
//! subdirectory. There is no eviction beyond the freshness window and no
//! cross-process locking; the run registry already keeps concurrent tasks in
//! one run off the same package.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::error::CacheError;
use crate::registry::metadata::PackageMetadata;

pub struct MetadataCache {
    dir: PathBuf,
    freshness_window: Duration,
    bypass_reads: bool,
}

impl MetadataCache {
    /// A cache rooted at `dir`. With `bypass_reads` set, every read misses
    /// (forcing refetch) while writes still land on disk.
    pub fn new(dir: PathBuf, freshness_window: Duration, bypass_reads: bool) -> Self {
        Self {
            dir,
            freshness_window,
            bypass_reads,
        }
    }

    fn entry_path(&self, package_name: &str) -> PathBuf {
        self.dir.join(format!("{package_name}.json"))
    }

    /// A fresh cached entry for the package, if one exists. Stale, missing,
    /// or corrupt entries all read as absent; corruption is logged and left
    /// in place to be overwritten by the next store.
    pub fn load(&self, package_name: &str) -> Option<PackageMetadata> {
        if self.bypass_reads {
            return None;
        }

        let path = self.entry_path(package_name);
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        // A clock that went backwards reads as a miss, same as a stale entry.
        let age = SystemTime::now().duration_since(modified).ok()?;
        if age > self.freshness_window {
            debug!("cache entry for {package_name} is stale ({age:?} old)");
            return None;
        }

        let content = fs::read(&path).ok()?;
        match serde_json::from_slice(&content) {
            Ok(meta) => {
                debug!("cache hit for {package_name}");
                Some(meta)
            }
            Err(err) => {
                warn!("ignoring corrupt cache entry {}: {err}", path.display());
                None
            }
        }
    }

    /// Write the raw normalized metadata document through to disk.
    pub fn store(&self, package_name: &str, content: &Value) -> Result<(), CacheError> {
        let path = self.entry_path(package_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes = serde_json::to_vec(content).map_err(|source| CacheError::Serialize {
            package: package_name.to_string(),
            source,
        })?;

        fs::write(&path, bytes).map_err(|source| CacheError::Io { path, source })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
