//! Logging setup.
//!
//! Progress for every phase of a purge is reported through `tracing` events;
//! this module installs the subscriber that prints them.

mod tracing_init;

pub use tracing_init::*;

/// Level of the per-page, per-alias and per-deletion progress events.
///
/// Must stay visible under the default `info` filter.
pub const PROGRESS_LEVEL: tracing::Level = tracing::Level::INFO;
