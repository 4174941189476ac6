//! Cutoff decision for one package
//!
//! Given a package's release timeline and the version the lockfile selected,
//! decide whether that version predates the cutoff, and when it does not,
//! find the newest release that does.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::registry::metadata::PackageMetadata;

/// The resolver could not judge the installed version. Reported as
/// inconclusive by the caller, never fatal.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{package} has no {version} in its registry history")]
    MissingVersionMetadata { package: String, version: String },

    #[error("{package}@{version} has unparseable publish timestamp {timestamp:?}")]
    BadTimestamp {
        package: String,
        version: String,
        timestamp: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Installed version was published strictly before the cutoff.
    Pass { published: DateTime<Utc> },
    /// Installed version is too new; `version` is the newest release
    /// published at-or-before the cutoff.
    Downgrade {
        version: String,
        published: DateTime<Utc>,
    },
    /// Every candidate release is newer than the cutoff.
    NoAlternative,
}

/// Judge the installed version against the cutoff.
///
/// The downgrade search runs over `meta.versions` in registry-reported order
/// and trusts that order to be chronological, which is how npm reports it.
/// Pre-release versions (a `-` separator) are dropped from the candidate set
/// unless `include_prerelease`; so are versions without a usable timestamp.
pub fn resolve(
    meta: &PackageMetadata,
    installed: &str,
    cutoff: DateTime<Utc>,
    include_prerelease: bool,
) -> Result<Decision, ResolveError> {
    let published = installed_publish_time(meta, installed)?;
    if published < cutoff {
        return Ok(Decision::Pass { published });
    }

    let candidates: Vec<(&str, DateTime<Utc>)> = meta
        .versions
        .iter()
        .filter(|version| include_prerelease || !version.contains('-'))
        .filter_map(|version| {
            let timestamp = parse_timestamp(meta.publish_time(version)?)?;
            Some((version.as_str(), timestamp))
        })
        .collect();

    match newest_at_or_before(&candidates, cutoff) {
        Some((version, published)) => Ok(Decision::Downgrade {
            version: version.to_string(),
            published,
        }),
        None => Ok(Decision::NoAlternative),
    }
}

fn installed_publish_time(
    meta: &PackageMetadata,
    installed: &str,
) -> Result<DateTime<Utc>, ResolveError> {
    let timestamp = meta
        .publish_time(installed)
        .ok_or_else(|| ResolveError::MissingVersionMetadata {
            package: meta.name.clone(),
            version: installed.to_string(),
        })?;

    parse_timestamp(timestamp).ok_or_else(|| ResolveError::BadTimestamp {
        package: meta.name.clone(),
        version: installed.to_string(),
        timestamp: timestamp.to_string(),
    })
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Binary search over a chronologically ordered candidate list.
///
/// The window shrinks around its own midpoint: a probe newer than the cutoff
/// discards the right half including everything past the probe, an older or
/// equal probe discards everything left of it. The surviving element is only
/// an answer if it is itself at-or-before the cutoff.
fn newest_at_or_before<'a>(
    candidates: &[(&'a str, DateTime<Utc>)],
    cutoff: DateTime<Utc>,
) -> Option<(&'a str, DateTime<Utc>)> {
    if candidates.is_empty() {
        return None;
    }

    let mut window = candidates;
    while window.len() > 1 {
        let mid = window.len() / 2;
        if window[mid].1 > cutoff {
            window = &window[..mid];
        } else {
            window = &window[mid..];
        }
    }

    let (version, published) = window[0];
    (published <= cutoff).then_some((version, published))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    /// Timeline with versions 0.1.0 through 0.5.0 published on Jan 1 of
    /// 2016..=2020, plus a 2015 pre-release.
    fn yearly_timeline() -> PackageMetadata {
        serde_json::from_value(json!({
            "name": "yearly",
            "versions": ["0.1.0-beta.1", "0.1.0", "0.2.0", "0.3.0", "0.4.0", "0.5.0"],
            "time": {
                "created": "2015-06-01T00:00:00.000Z",
                "modified": "2020-01-01T00:00:00.000Z",
                "0.1.0-beta.1": "2015-06-01T00:00:00.000Z",
                "0.1.0": "2016-01-01T00:00:00.000Z",
                "0.2.0": "2017-01-01T00:00:00.000Z",
                "0.3.0": "2018-01-01T00:00:00.000Z",
                "0.4.0": "2019-01-01T00:00:00.000Z",
                "0.5.0": "2020-01-01T00:00:00.000Z"
            }
        }))
        .unwrap()
    }

    #[test]
    fn installed_version_published_strictly_before_cutoff_passes() {
        let decision = resolve(&yearly_timeline(), "0.2.0", utc(2019, 6, 1), false).unwrap();

        assert_eq!(
            decision,
            Decision::Pass {
                published: utc(2017, 1, 1)
            }
        );
    }

    #[test]
    fn installed_version_published_at_the_cutoff_fails_and_recommends_itself() {
        // Pass requires strictly-before; the search accepts at-or-before, so
        // a version published exactly at the cutoff comes back as its own
        // downgrade target.
        let decision = resolve(&yearly_timeline(), "0.3.0", utc(2018, 1, 1), false).unwrap();

        assert_eq!(
            decision,
            Decision::Downgrade {
                version: "0.3.0".to_string(),
                published: utc(2018, 1, 1)
            }
        );
    }

    #[rstest]
    #[case(utc(2019, 6, 1), "0.4.0")] // newest release of 2019 or earlier
    #[case(utc(2017, 12, 31), "0.2.0")]
    #[case(utc(2016, 1, 1), "0.1.0")] // at-or-before keeps the boundary release
    fn downgrade_recommends_the_newest_release_at_or_before_cutoff(
        #[case] cutoff: DateTime<Utc>,
        #[case] expected: &str,
    ) {
        let decision = resolve(&yearly_timeline(), "0.5.0", cutoff, false).unwrap();

        match decision {
            Decision::Downgrade { version, .. } => assert_eq!(version, expected),
            other => panic!("expected a downgrade, got {other:?}"),
        }
    }

    #[test]
    fn search_agrees_with_a_linear_scan_for_every_cutoff_position() {
        let meta = yearly_timeline();

        for year in 2014..=2021 {
            let cutoff = utc(year, 6, 1);
            let decision = resolve(&meta, "0.5.0", cutoff, false);

            let expected = meta
                .versions
                .iter()
                .filter(|v| !v.contains('-'))
                .filter_map(|v| {
                    let ts = parse_timestamp(meta.publish_time(v)?)?;
                    (ts <= cutoff).then_some((v.clone(), ts))
                })
                .max_by_key(|(_, ts)| *ts);

            match (year >= 2020, expected) {
                // 0.5.0 itself passes once the cutoff moves past its release
                (true, _) => assert!(matches!(decision, Ok(Decision::Pass { .. }))),
                (false, Some((version, _))) => {
                    assert_eq!(
                        decision.unwrap(),
                        Decision::Downgrade {
                            version: version.clone(),
                            published: parse_timestamp(meta.publish_time(&version).unwrap())
                                .unwrap()
                        }
                    );
                }
                (false, None) => {
                    assert_eq!(decision.unwrap(), Decision::NoAlternative);
                }
            }
        }
    }

    #[test]
    fn entirely_newer_timeline_yields_no_alternative() {
        let decision = resolve(&yearly_timeline(), "0.5.0", utc(2015, 12, 1), false).unwrap();

        assert_eq!(decision, Decision::NoAlternative);
    }

    #[test]
    fn prerelease_only_history_yields_no_alternative_without_the_flag() {
        // The only release before the cutoff is a pre-release; filtered out,
        // nothing satisfies the date constraint.
        let decision = resolve(&yearly_timeline(), "0.5.0", utc(2015, 7, 1), false).unwrap();

        assert_eq!(decision, Decision::NoAlternative);
    }

    #[test]
    fn include_prerelease_keeps_prereleases_as_candidates() {
        let decision = resolve(&yearly_timeline(), "0.5.0", utc(2015, 7, 1), true).unwrap();

        assert_eq!(
            decision,
            Decision::Downgrade {
                version: "0.1.0-beta.1".to_string(),
                published: utc(2015, 6, 1)
            }
        );
    }

    #[test]
    fn installed_version_missing_from_history_is_a_resolver_error() {
        let result = resolve(&yearly_timeline(), "9.9.9", utc(2020, 1, 1), false);

        assert!(matches!(
            result,
            Err(ResolveError::MissingVersionMetadata { .. })
        ));
    }

    #[test]
    fn unparseable_installed_timestamp_is_a_resolver_error() {
        let meta: PackageMetadata = serde_json::from_value(json!({
            "name": "bad-clock",
            "versions": ["1.0.0"],
            "time": { "1.0.0": "not a timestamp" }
        }))
        .unwrap();

        let result = resolve(&meta, "1.0.0", utc(2020, 1, 1), false);
        assert!(matches!(result, Err(ResolveError::BadTimestamp { .. })));
    }

    #[test]
    fn single_candidate_newer_than_cutoff_yields_no_alternative() {
        let meta: PackageMetadata = serde_json::from_value(json!({
            "name": "single",
            "versions": ["1.0.0"],
            "time": { "1.0.0": "2021-03-01T00:00:00.000Z" }
        }))
        .unwrap();

        let decision = resolve(&meta, "1.0.0", utc(2020, 1, 1), false).unwrap();
        assert_eq!(decision, Decision::NoAlternative);
    }

    #[test]
    fn single_candidate_at_or_before_cutoff_is_recommended() {
        let meta: PackageMetadata = serde_json::from_value(json!({
            "name": "single",
            "versions": ["1.0.0", "2.0.0"],
            "time": {
                "1.0.0": "2019-03-01T00:00:00.000Z",
                "2.0.0": "2021-03-01T00:00:00.000Z"
            }
        }))
        .unwrap();

        let decision = resolve(&meta, "2.0.0", utc(2020, 1, 1), false).unwrap();
        assert_eq!(
            decision,
            Decision::Downgrade {
                version: "1.0.0".to_string(),
                published: Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap()
            }
        );
    }

    #[test]
    fn versions_without_timestamps_are_dropped_from_the_candidate_set() {
        // 1.5.0 appears in `versions` but has no `time` entry; the search
        // must not trip over it.
        let meta: PackageMetadata = serde_json::from_value(json!({
            "name": "gappy",
            "versions": ["1.0.0", "1.5.0", "2.0.0"],
            "time": {
                "1.0.0": "2019-01-01T00:00:00.000Z",
                "2.0.0": "2021-01-01T00:00:00.000Z"
            }
        }))
        .unwrap();

        let decision = resolve(&meta, "2.0.0", utc(2020, 1, 1), false).unwrap();
        assert_eq!(
            decision,
            Decision::Downgrade {
                version: "1.0.0".to_string(),
                published: utc(2019, 1, 1)
            }
        );
    }

    #[test]
    fn empty_candidate_set_yields_no_alternative() {
        let meta: PackageMetadata = serde_json::from_value(json!({
            "name": "only-pre",
            "versions": ["1.0.0-alpha.1", "1.0.0-alpha.2"],
            "time": {
                "1.0.0-alpha.1": "2019-01-01T00:00:00.000Z",
                "1.0.0-alpha.2": "2021-06-01T00:00:00.000Z"
            }
        }))
        .unwrap();

        let decision = resolve(&meta, "1.0.0-alpha.2", utc(2020, 1, 1), false).unwrap();
        assert_eq!(decision, Decision::NoAlternative);
    }
}
