//! Release metadata lookup
//!
//! The registry is never spoken to directly: lookups are delegated to the
//! `npm` CLI, with a disk cache in front so repeated runs stay cheap.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  validate   │────▶│    cache    │────▶│   fetcher   │
//! │ (grammars)  │     │ (per-file)  │     │ (npm info)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        └──────────── client drives all three ─────────┘
//! ```
//!
//! - [`validate`]: package-name / version-spec grammar gates
//! - [`fetcher`]: the external `npm info --json` collaborator
//! - [`metadata`]: typed release timeline parsed from npm output
//! - [`cache`]: file-per-package metadata cache with a freshness window
//! - [`client`]: ties validation, cache, and fetcher together
//! - [`error`]: error types for lookup and cache operations

pub mod cache;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod metadata;
pub mod validate;
