//! Registry client: validation, cache, and the external fetcher in one seam

use serde_json::Value;
use tracing::{debug, warn};

use crate::registry::cache::MetadataCache;
use crate::registry::error::LookupError;
use crate::registry::fetcher::MetadataFetcher;
use crate::registry::metadata::{self, PackageMetadata};
use crate::registry::validate;

/// Resolves a `(package, version spec)` pair to its release timeline.
///
/// Inputs are validated before anything else happens: both values come out of
/// an untrusted lockfile and end up on an external command line, so nothing
/// unvalidated may reach the fetcher. After the gate, a fresh cache entry
/// short-circuits the lookup entirely; otherwise the fetcher runs once and
/// its normalized output is written through to the cache.
pub struct RegistryClient {
    fetcher: Box<dyn MetadataFetcher>,
    cache: MetadataCache,
}

impl RegistryClient {
    pub fn new(fetcher: Box<dyn MetadataFetcher>, cache: MetadataCache) -> Self {
        Self { fetcher, cache }
    }

    /// Full release timeline for `package_name`, from cache or the fetcher.
    ///
    /// Failures are scoped to this package; the caller reports it
    /// inconclusive and continues with its siblings.
    pub async fn release_timeline(
        &self,
        package_name: &str,
        version_spec: &str,
    ) -> Result<PackageMetadata, LookupError> {
        validate::package_name(package_name)?;
        validate::version_spec(version_spec)?;

        if let Some(meta) = self.cache.load(package_name) {
            return Ok(meta);
        }

        let raw = self.fetcher.fetch(package_name, version_spec).await?;
        let document = metadata::normalize(&raw)?;
        let meta: PackageMetadata = parse_document(&document)?;

        self.cache.store(package_name, &document)?;
        debug!("cached metadata for {package_name}");

        Ok(meta)
    }
}

fn parse_document(document: &Value) -> Result<PackageMetadata, LookupError> {
    serde_json::from_value(document.clone()).map_err(|err| {
        warn!("npm metadata document has an unexpected shape: {err}");
        LookupError::Malformed(err)
    })
}
