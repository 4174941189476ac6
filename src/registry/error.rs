use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A single package's metadata lookup failed. Never fatal to the run: the
/// walker reports the package as inconclusive and moves on.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("package name {0:?} does not match the registry name grammar")]
    InvalidPackageName(String),

    #[error("version spec {0:?} does not match the semver range grammar")]
    InvalidVersionSpec(String),

    #[error("failed to launch npm: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("npm info exited with {status}: {stderr}")]
    CommandFailed { status: ExitStatus, stderr: String },

    #[error("npm info produced {size} bytes of output, over the {limit} byte cap")]
    OutputTooLarge { size: usize, limit: usize },

    #[error("npm info returned unparseable JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("npm info returned an empty result")]
    EmptyResponse,

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache write failed at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize metadata for {package}: {source}")]
    Serialize {
        package: String,
        source: serde_json::Error,
    },
}
