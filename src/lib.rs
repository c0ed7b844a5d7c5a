#![forbid(unsafe_code)]
//! just-test: a small TAP test harness.
//!
//! Test scripts are ordinary binaries. They create a [`Harness`], run groups of assertions against an [`Assert`]
//! context, and return the code from [`Harness::finish`]. Results are printed to stdout as TAP while they happen;
//! runtime faults (triggered warnings and errors, panics, bodies returning `Err`) become a single `not ok 0 error`
//! record on stderr and a failing exit status.
//!
//! ## Examples
//! ```rust,no_run
//! use just_test::Harness;
//!
//! fn main() -> std::process::ExitCode {
//!     let mut harness = Harness::new();
//!     harness.group("equals", |t| {
//!         t.equals(1, "1", "loosely equal");
//!         t.ok(true, "true is ok");
//!     });
//!     harness.finish().into()
//! }
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: use `Result`/`Option` with `?`. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Test bodies**: a panic that unwinds out of a group is an uncaught failure and is reported by the interceptor.
//!   A panic the body catches itself is not.

pub mod assert;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod interceptor;
pub mod logging;
pub mod reporter;
pub mod shutdown;

pub use assert::Assert;
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use harness::{GroupHook, GroupOptions, GroupOutcome, Harness};
pub use interceptor::{Interceptor, InterceptorState, Terminate, trigger_error};
pub use reporter::{SharedBuffer, TapReporter};
pub use shutdown::{ExitCode, ShutdownQueue};

pub use just_test_core::{Counts, Diagnostics, Severity, SourceLocation, Value};
