//! Line-oriented run report
//!
//! stdout carries the product output: one block of `# `/`#!` status lines per
//! package, plus ready-to-run `npm install` commands for every downgrade.
//! Diagnostics go to stderr through `tracing` and never mix into this stream.

use chrono::{DateTime, SecondsFormat, Utc};

/// How a downgrade should be saved back into the manifest: direct
/// dependencies are pinned exactly, transitive ones become peer entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Exact,
    Peer,
}

impl SaveMode {
    fn flag(self) -> &'static str {
        match self {
            SaveMode::Exact => "--save-exact",
            SaveMode::Peer => "--save-peer",
        }
    }
}

/// Final status for one package.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Installed version predates the cutoff.
    UpToDate { published: DateTime<Utc> },
    /// Installed version is too new; a dated alternative exists.
    Downgrade {
        version: String,
        published: DateTime<Utc>,
    },
    /// Installed version is too new and nothing older exists to recommend.
    NoAlternative,
    /// The package could not be judged (lookup or metadata problem).
    Inconclusive { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
    pub name: String,
    pub requested: String,
    pub actual: String,
    pub save_mode: SaveMode,
    pub outcome: Outcome,
}

impl PackageReport {
    /// The stdout lines for this package.
    pub fn render(&self) -> Vec<String> {
        let name = &self.name;
        let actual = &self.actual;

        match &self.outcome {
            Outcome::UpToDate { published } => {
                vec![format!(
                    "#  {name}@{actual}: published {}, before the cutoff",
                    fmt_ts(published)
                )]
            }
            Outcome::Downgrade { version, published } => vec![
                format!("#! {name}@{actual}: newer than the cutoff"),
                format!("#  {name}@{version}: published {}", fmt_ts(published)),
                format!("npm install {} {name}@{version}", self.save_mode.flag()),
            ],
            Outcome::NoAlternative => {
                vec![format!(
                    "#! {name}@{actual}: every release is newer than the cutoff, nothing to recommend"
                )]
            }
            Outcome::Inconclusive { reason } => {
                vec![format!("#! {name}@{}: {reason}", self.requested)]
            }
        }
    }
}

fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Prints report lines to stdout as results complete.
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn banner(&self, cutoff: DateTime<Utc>) {
        println!("#  looking for packages released at or after {}", fmt_ts(&cutoff));
    }

    pub fn section(&self, title: &str) {
        println!();
        println!("#  {title}:");
    }

    pub fn emit(&self, report: &PackageReport) {
        for line in report.render() {
            println!("{line}");
        }
    }

    pub fn missing_graph_entry(&self, name: &str) {
        println!("#! lockfile has no dependency entry for {name}, skipping");
    }

    pub fn summary(&self, reports: &[PackageReport]) {
        let mut ok = 0usize;
        let mut downgrades = 0usize;
        let mut stuck = 0usize;
        let mut inconclusive = 0usize;

        for report in reports {
            match report.outcome {
                Outcome::UpToDate { .. } => ok += 1,
                Outcome::Downgrade { .. } => downgrades += 1,
                Outcome::NoAlternative => stuck += 1,
                Outcome::Inconclusive { .. } => inconclusive += 1,
            }
        }

        println!();
        println!(
            "#  checked {} packages: {ok} ok, {downgrades} to downgrade, {stuck} without alternative, {inconclusive} inconclusive",
            reports.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report(outcome: Outcome, save_mode: SaveMode) -> PackageReport {
        PackageReport {
            name: "lodash".to_string(),
            requested: "^4.17.21".to_string(),
            actual: "4.17.21".to_string(),
            save_mode,
            outcome,
        }
    }

    #[test]
    fn up_to_date_renders_a_single_ok_line() {
        let published = Utc.with_ymd_and_hms(2019, 7, 19, 2, 28, 46).unwrap();
        let lines = report(Outcome::UpToDate { published }, SaveMode::Exact).render();

        assert_eq!(
            lines,
            vec!["#  lodash@4.17.21: published 2019-07-19T02:28:46Z, before the cutoff"]
        );
    }

    #[test]
    fn downgrade_renders_a_runnable_install_command() {
        let published = Utc.with_ymd_and_hms(2019, 10, 28, 0, 0, 0).unwrap();
        let lines = report(
            Outcome::Downgrade {
                version: "4.17.15".to_string(),
                published,
            },
            SaveMode::Exact,
        )
        .render();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "npm install --save-exact lodash@4.17.15");
    }

    #[test]
    fn transitive_downgrades_use_save_peer() {
        let published = Utc.with_ymd_and_hms(2019, 10, 28, 0, 0, 0).unwrap();
        let lines = report(
            Outcome::Downgrade {
                version: "4.17.15".to_string(),
                published,
            },
            SaveMode::Peer,
        )
        .render();

        assert_eq!(lines[2], "npm install --save-peer lodash@4.17.15");
    }

    #[test]
    fn no_alternative_renders_a_warning_without_a_command() {
        let lines = report(Outcome::NoAlternative, SaveMode::Exact).render();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("#! lodash@4.17.21"));
    }

    #[test]
    fn inconclusive_names_the_requested_spec_and_reason() {
        let lines = report(
            Outcome::Inconclusive {
                reason: "npm info returned an empty result".to_string(),
            },
            SaveMode::Exact,
        )
        .render();

        assert_eq!(
            lines,
            vec!["#! lodash@^4.17.21: npm info returned an empty result"]
        );
    }
}
