//! Data model for package-lock.json (lockfileVersion 2)
//!
//! Only the fields the walker reads are modeled; everything else in the
//! lockfile is ignored during deserialization. Maps are `IndexMap` so that
//! iteration order matches file order, which determines the order edges are
//! submitted to the lookup pool.

use indexmap::IndexMap;
use serde::Deserialize;

/// A resolved lockfile: the root manifest entry under `packages[""]` plus the
/// flat map of every installed package, each of which may carry its own
/// nested `dependencies` sub-map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLock {
    #[serde(default)]
    pub lockfile_version: u32,
    #[serde(default)]
    pub packages: IndexMap<String, ManifestEntry>,
    #[serde(default)]
    pub dependencies: IndexMap<String, PackageNode>,
}

/// An entry under `packages`; the walker only ever looks at the root entry
/// (key `""`), which lists what the project itself declared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

/// One resolved package in the flat `dependencies` map or nested under
/// another package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageNode {
    pub version: String,
    #[serde(default)]
    pub resolved: Option<String>,
    #[serde(default)]
    pub integrity: Option<String>,
    #[serde(default)]
    pub dev: bool,
    #[serde(default)]
    pub requires: IndexMap<String, String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, PackageNode>,
}

impl PackageLock {
    /// The root manifest entry, or an empty one for lockfiles without a
    /// `packages[""]` record.
    pub fn root(&self) -> ManifestEntry {
        self.packages.get("").cloned().unwrap_or_default()
    }

    /// Whether `name` is declared by the project itself (runtime or dev).
    pub fn is_root_dependency(&self, name: &str) -> bool {
        self.packages
            .get("")
            .is_some_and(|root| {
                root.dependencies.contains_key(name) || root.dev_dependencies.contains_key(name)
            })
    }
}
