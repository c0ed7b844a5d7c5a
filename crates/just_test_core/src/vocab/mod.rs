//! Harness vocabulary registries.
//!
//! Callers work with **stable IDs** (`Severity`, `AssertOp`) and look up spellings and metadata via registry tables,
//! instead of matching on strings scattered across the harness.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no IO, no side effects.
//! - Spellings are what appears in TAP output (`notOk`, `doesNotThrow`) or in configuration (`user-warning`).
//!
//! ## Examples
//! ```rust
//! use just_test_core::vocab::severities::{self, Severity};
//!
//! assert_eq!(severities::from_str("user-warning"), Some(Severity::UserWarning));
//! assert_eq!(severities::as_str(Severity::UserWarning), "user-warning");
//! ```

pub mod operators;
pub mod registry;
pub mod severities;
