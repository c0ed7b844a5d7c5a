//! The per-group assertion context.
//!
//! Every assertion prints its result immediately and returns whether it passed. Assertions are `#[track_caller]`,
//! so the `at:` line of a failure points at the test script, not at this module.
//!
//! ## Notes
//!
//! - `ok`/`not_ok` use strict identity: only the boolean `true` (or `false`) passes.
//! - `equals`/`not_equals` use coercive equality, see [`just_test_core::values::loosely_equal`].
//! - `throws`/`does_not_throw` run the callable inside a fault boundary that turns an `Err` into
//!   `exception '<Kind>' with message '<msg>'`. Panics are not caught; they reach the interceptor like any other
//!   uncaught failure.
//! - A `throws` pattern is a regex, optionally written with slash delimiters and trailing flags (`/exception/i`).

use std::error::Error;

use just_test_core::values::{self, Value};
use just_test_core::{AssertOp, Diagnostics, Fault, FaultRecord, Outcome, Severity, SourceLocation};
use regex::Regex;

use crate::error::{HarnessError, HarnessResult};
use crate::harness::HarnessState;

/// Assertion methods handed to a group body.
#[derive(Debug, Clone, Copy)]
pub struct Assert<'h> {
    state: &'h HarnessState,
}

impl<'h> Assert<'h> {
    pub(crate) fn new(state: &'h HarnessState) -> Self {
        Self { state }
    }

    /// `ok {n} {message}`
    #[track_caller]
    pub fn pass(&self, message: &str) -> bool {
        self.state.record(Outcome::Pass, message, None)
    }

    /// `not ok {n} {message}` with no diagnostic block.
    #[track_caller]
    pub fn fail(&self, message: &str) -> bool {
        self.state.record(Outcome::Fail, message, None)
    }

    #[track_caller]
    pub fn fail_with(&self, message: &str, diagnostics: Diagnostics) -> bool {
        self.state.record(Outcome::Fail, message, Some(&diagnostics))
    }

    /// Passes only for the boolean `true`.
    #[track_caller]
    pub fn ok(&self, value: impl Into<Value>, message: &str) -> bool {
        self.identical(AssertOp::Ok, value.into(), true, message)
    }

    /// Passes only for the boolean `false`.
    #[track_caller]
    pub fn not_ok(&self, value: impl Into<Value>, message: &str) -> bool {
        self.identical(AssertOp::NotOk, value.into(), false, message)
    }

    #[track_caller]
    pub fn equals(&self, actual: impl Into<Value>, expected: impl Into<Value>, message: &str) -> bool {
        let (actual, expected) = (actual.into(), expected.into());
        if values::loosely_equal(&actual, &expected) {
            return self.pass(message);
        }
        let diagnostics = Diagnostics::for_op(AssertOp::Equals, SourceLocation::caller())
            .expected(expected)
            .actual(actual);
        self.fail_with(message, diagnostics)
    }

    /// On failure only `actual` is reported.
    #[track_caller]
    pub fn not_equals(&self, actual: impl Into<Value>, expected: impl Into<Value>, message: &str) -> bool {
        let (actual, expected) = (actual.into(), expected.into());
        if !values::loosely_equal(&actual, &expected) {
            return self.pass(message);
        }
        let diagnostics = Diagnostics::for_op(AssertOp::NotEquals, SourceLocation::caller()).actual(actual);
        self.fail_with(message, diagnostics)
    }

    /// Passes when `callable` returns `Err` and its description matches `pattern`.
    ///
    /// The pattern is only compiled once there is a description to match; an invalid pattern is then raised as a
    /// `Warning` fault.
    #[track_caller]
    pub fn throws<T, E, F>(&self, callable: F, pattern: &str, message: &str) -> bool
    where
        E: Error,
        F: FnOnce() -> Result<T, E>,
    {
        let at = SourceLocation::caller();
        let actual = fault_boundary(callable).err().map(|fault| fault.to_string());

        if let Some(description) = &actual {
            match compile_pattern(pattern) {
                Ok(regex) if regex.is_match(description) => return self.pass(message),
                Ok(_) => {}
                Err(err) => self.state.raise(FaultRecord::new(Severity::Warning, err.to_string(), at.clone())),
            }
        }

        let mut diagnostics = Diagnostics::for_op(AssertOp::Throws, at).expected(pattern);
        if let Some(description) = actual {
            diagnostics = diagnostics.actual(description);
        }
        self.fail_with(message, diagnostics)
    }

    /// Passes when `callable` returns `Ok`.
    #[track_caller]
    pub fn does_not_throw<T, E, F>(&self, callable: F, message: &str) -> bool
    where
        E: Error,
        F: FnOnce() -> Result<T, E>,
    {
        match fault_boundary(callable) {
            Ok(_) => self.pass(message),
            Err(fault) => {
                let diagnostics =
                    Diagnostics::for_op(AssertOp::DoesNotThrow, SourceLocation::caller()).actual(fault.to_string());
                self.fail_with(message, diagnostics)
            }
        }
    }

    /// Raise a runtime fault at the call site.
    #[track_caller]
    pub fn trigger(&self, severity: Severity, message: impl Into<String>) {
        self.state.raise(FaultRecord::new(severity, message, SourceLocation::caller()));
    }

    #[track_caller]
    fn identical(&self, op: AssertOp, actual: Value, expected: bool, message: &str) -> bool {
        let expected = Value::Bool(expected);
        if values::is_identical(&actual, &expected) {
            return self.pass(message);
        }
        let diagnostics = Diagnostics::for_op(op, SourceLocation::caller())
            .expected(expected)
            .actual(actual);
        self.fail_with(message, diagnostics)
    }
}

/// Run `callable` once, reducing an `Err` to its description.
fn fault_boundary<T, E: Error>(callable: impl FnOnce() -> Result<T, E>) -> Result<T, Fault> {
    callable().map_err(|err| Fault::from_error(&err))
}

fn compile_pattern(pattern: &str) -> HarnessResult<Regex> {
    let source = match delimited(pattern) {
        Some((body, "")) => body.to_string(),
        Some((body, flags)) => format!("(?{flags}){body}"),
        None => pattern.to_string(),
    };
    Regex::new(&source).map_err(|source| HarnessError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Split `/body/flags` into its parts when the flags are ones the regex engine understands.
fn delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    flags
        .chars()
        .all(|flag| matches!(flag, 'i' | 'm' | 's' | 'x' | 'u'))
        .then_some((body, flags))
}
