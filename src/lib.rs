//! depdate checks every dependency locked in a package-lock.json against a
//! publish-date cutoff: versions published strictly before the cutoff pass,
//! anything newer gets the newest release that does predate the cutoff
//! recommended as a downgrade.
//!
//! Registry knowledge is delegated to the `npm` CLI; results are cached on
//! disk for a day so repeated runs stay cheap.

pub mod check;
pub mod config;
pub mod lockfile;
pub mod registry;
pub mod report;
