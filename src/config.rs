use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Defaults
// =============================================================================

/// How long a cached metadata file stays fresh (24 hours)
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Default number of metadata lookups allowed in flight at once
pub const DEFAULT_PARALLEL_LIMIT: usize = 8;

/// Default cap on captured `npm info` output (5 MiB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 5 * 1024 * 1024;

/// Run-wide configuration, built once from the command line and passed down.
///
/// Nothing below the entry point reads environment variables; everything the
/// walker and the registry client need is carried here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Treat every cache entry as absent when reading (writes still happen)
    pub ignore_cache: bool,
    /// Keep pre-release versions as downgrade candidates
    pub include_prerelease: bool,
    /// Also walk the transitive dependency graph after the direct pass
    pub full_graph: bool,
    /// Width of the lookup pool
    pub parallel_limit: usize,
    /// Cap on captured `npm info` output
    pub max_output_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_cache: false,
            include_prerelease: false,
            full_graph: false,
            parallel_limit: DEFAULT_PARALLEL_LIMIT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Returns the metadata cache directory.
/// Uses $XDG_CACHE_HOME/depdate if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/depdate,
/// or ./depdate if neither is available.
pub fn cache_dir() -> PathBuf {
    cache_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir())
}

fn cache_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let cache_dir = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    cache_dir.join("depdate")
}
