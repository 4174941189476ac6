//! The external metadata collaborator
//!
//! All registry knowledge lives in the npm CLI; this crate only runs it and
//! captures its output. The trait is the seam the rest of the crate (and the
//! tests) program against.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::registry::error::LookupError;

/// Fetches raw release metadata for a `name@spec` pair.
///
/// Implementations receive pre-validated inputs; the grammar gates in
/// [`crate::registry::validate`] run before any fetch is issued.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Returns the collaborator's raw JSON output for the package.
    async fn fetch(&self, package_name: &str, version_spec: &str) -> Result<Vec<u8>, LookupError>;
}

/// Production fetcher: `npm info --json <name>@<spec>`.
pub struct NpmCli {
    max_output_bytes: usize,
}

impl NpmCli {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }
}

#[async_trait::async_trait]
impl MetadataFetcher for NpmCli {
    async fn fetch(&self, package_name: &str, version_spec: &str) -> Result<Vec<u8>, LookupError> {
        let spec = format!("{package_name}@{version_spec}");
        debug!("running: npm info --json {spec}");

        let output = Command::new("npm")
            .args(["info", "--json", &spec])
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(LookupError::CommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if output.stdout.len() > self.max_output_bytes {
            return Err(LookupError::OutputTooLarge {
                size: output.stdout.len(),
                limit: self.max_output_bytes,
            });
        }

        Ok(output.stdout)
    }
}
