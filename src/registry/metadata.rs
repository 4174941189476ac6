//! Typed release timeline parsed from `npm info --json` output

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::registry::error::LookupError;

/// The subset of the npm metadata document the checker consumes: the version
/// list in registry-reported order and the version → publish-timestamp map.
///
/// The `time` map also carries non-version keys (`created`, `modified`);
/// consumers only ever index it by version identifier, so those are inert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub time: IndexMap<String, String>,
}

impl PackageMetadata {
    /// Publish timestamp for a version, if the registry reported one.
    pub fn publish_time(&self, version: &str) -> Option<&str> {
        self.time.get(version).map(String::as_str)
    }
}

/// Normalize raw npm output into a single metadata document.
///
/// An ambiguous version spec makes npm print an array of documents; the first
/// element wins. An empty array means the spec matched nothing.
pub fn normalize(raw: &[u8]) -> Result<Value, LookupError> {
    let value: Value = serde_json::from_slice(raw)?;

    match value {
        Value::Array(mut items) => {
            if items.is_empty() {
                Err(LookupError::EmptyResponse)
            } else {
                Ok(items.remove(0))
            }
        }
        other => Ok(other),
    }
}
