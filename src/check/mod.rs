//! Cutoff checking
//!
//! - resolver.rs: pass/fail decision and the downgrade search
//! - run_registry.rs: once-per-name claim set for one run
//! - walker.rs: dependency graph traversal and the lookup pool

pub mod resolver;
pub mod run_registry;
pub mod walker;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unrecognized cutoff date {input:?}; expected RFC 3339, 'YYYY-MM-DD HH:MM:SS', or 'YYYY-MM-DD'")]
pub struct CutoffParseError {
    input: String,
}

/// Parse the caller-supplied cutoff. Date-only input means midnight UTC.
/// This is the one piece of user input whose rejection aborts the run.
pub fn parse_cutoff(input: &str) -> Result<DateTime<Utc>, CutoffParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CutoffParseError {
        input: input.to_string(),
    })
}
