//! Lockfile discovery and loading
//!
//! The lockfile is the one input whose absence is fatal: everything else in a
//! run degrades to a per-package warning, but without a readable
//! package-lock.json there is nothing to check.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::lockfile::types::PackageLock;

pub const LOCKFILE_NAME: &str = "package-lock.json";

#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("no package-lock.json found in {} or any parent directory", .start.display())]
    NotFound { start: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Locate the nearest package-lock.json, walking up from `start`.
pub fn discover(start: &Path) -> Result<PathBuf, LockfileError> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(LOCKFILE_NAME);
        if candidate.is_file() {
            debug!("using lockfile at {}", candidate.display());
            return Ok(candidate);
        }
        dir = current.parent();
    }

    Err(LockfileError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Read and parse the lockfile at `path`.
pub fn load(path: &Path) -> Result<PackageLock, LockfileError> {
    let content = fs::read_to_string(path).map_err(|source| LockfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LockfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
