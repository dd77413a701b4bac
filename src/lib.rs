//! Shared library for `gradetally`
//! Contains the grade aggregation core used by the CLI and by library consumers.

pub mod core;

pub use core::{aggregator, config, report, scheme, scores};

/// Returns the current version of the `gradetally` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
