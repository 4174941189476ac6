//! package-lock.json reading
//!
//! - types.rs: data model for lockfile version 2
//! - loader.rs: lockfile discovery and parsing

pub mod loader;
pub mod types;
