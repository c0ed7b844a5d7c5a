//! Library error type.
//!
//! Assertion failures are not errors: they are counted and reported as `not ok` lines. `HarnessError` covers the
//! things that go wrong around the assertions: a pattern that is not a valid regex, a bad configuration value, or an
//! output stream that refuses a write.

use std::io;

use thiserror::Error;

/// Errors produced by the harness library.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid expected-exception pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("invalid log filter '{filter}': {source}")]
    InvalidLogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("failed to write test output: {0}")]
    Io(#[from] io::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
