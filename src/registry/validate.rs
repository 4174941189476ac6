//! Input grammars for values that reach the npm command line
//!
//! The lockfile is untrusted input and both the package name and the version
//! spec end up interpolated into an external command, so each must match its
//! registry grammar before any command is constructed. A mismatch skips the
//! package; it never reaches the fetcher.

use std::sync::LazyLock;

use regex::Regex;

use crate::registry::error::LookupError;

/// npm package names: optional @scope/ prefix, lowercase URL-safe characters.
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@[a-z0-9-~][a-z0-9-._~]*/)?[a-z0-9-~][a-z0-9-._~]*$")
        .expect("package name regex must compile")
});

/// Semver ranges as they appear in lockfiles: wildcards, optional ~/^ prefix,
/// dotted numeric components with x/* placeholders, pre-release and build
/// metadata suffixes. Anything else (URLs, tags, compound ranges) is refused.
static VERSION_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\*|x|[~^]?(0|[1-9]\d*)(?:\.(?:\*|x|(0|[1-9]\d*)(?:\.(?:\*|x|(0|[1-9]\d*)))?))?)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("version spec regex must compile")
});

pub fn package_name(name: &str) -> Result<(), LookupError> {
    if PACKAGE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(LookupError::InvalidPackageName(name.to_string()))
    }
}

pub fn version_spec(spec: &str) -> Result<(), LookupError> {
    if VERSION_SPEC.is_match(spec) {
        Ok(())
    } else {
        Err(LookupError::InvalidVersionSpec(spec.to_string()))
    }
}
