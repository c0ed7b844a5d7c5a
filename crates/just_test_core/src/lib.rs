#![forbid(unsafe_code)]
//! Provide the shared, pure vocabulary and rendering helpers for the just-test harness.
//!
//! Everything in this crate is deterministic: it decides *what* a TAP line, a diagnostic block, or a fault record looks
//! like, and *how* assertion values compare. Writing those lines to a stream, counting results across groups, and
//! terminating the process all live in the `just-test` crate.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, and no process control.
//! - Current scope: severity and assertion-operator registries, value formatting and coercive equality, fault
//!   descriptions with source locations, and TAP line rendering.
//!
//! ## Examples
//! ```rust
//! use just_test_core::tap::{self, Outcome};
//!
//! assert_eq!(tap::result_line(Outcome::Pass, 1, "all good"), "ok 1 all good");
//! assert_eq!(tap::result_line(Outcome::Fail, 2, "nope"), "not ok 2 nope");
//! ```

pub mod faults;
pub mod tap;
pub mod values;
pub mod vocab;

pub use faults::{Fault, FaultRecord, SourceLocation, UncaughtFault};
pub use tap::{Counts, Diagnostics, Outcome};
pub use values::Value;
pub use vocab::operators::AssertOp;
pub use vocab::severities::{Severity, SeverityLabel};
