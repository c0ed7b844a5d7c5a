//! Assertion operator vocabulary.
//!
//! The canonical spelling is what a failing assertion prints on its `operator:` diagnostic line. Aliases are the
//! snake_case method names of the assertion context, so tooling can map either form back to the same id.
//!
//! ## Examples
//! ```rust
//! use just_test_core::vocab::operators::{self, AssertOp};
//!
//! assert_eq!(operators::as_str(AssertOp::DoesNotThrow), "doesNotThrow");
//! assert_eq!(operators::from_str("does_not_throw"), Some(AssertOp::DoesNotThrow));
//! ```

use std::fmt;

use super::registry::{self, VocabInfo};

/// Stable identifier for every built-in assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertOp {
    Ok,
    NotOk,
    Equals,
    NotEquals,
    Throws,
    DoesNotThrow,
}

impl AssertOp {
    pub fn as_str(self) -> &'static str {
        as_str(self)
    }
}

impl fmt::Display for AssertOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Metadata for an assertion operator.
pub type OperatorInfo = VocabInfo<AssertOp>;

/// Registry of all assertion operators.
pub const OPERATORS: &[OperatorInfo] = &[
    info(AssertOp::Ok, "ok", &[], "Passes iff the value is exactly boolean `true`."),
    info(AssertOp::NotOk, "notOk", &["not_ok"], "Passes iff the value is exactly boolean `false`."),
    info(AssertOp::Equals, "equals", &[], "Passes iff both values are equal under coercive equality."),
    info(
        AssertOp::NotEquals,
        "notEquals",
        &["not_equals"],
        "Passes iff the values are not equal under coercive equality.",
    ),
    info(
        AssertOp::Throws,
        "throws",
        &[],
        "Passes iff the callable fails and its description matches the expected pattern.",
    ),
    info(
        AssertOp::DoesNotThrow,
        "doesNotThrow",
        &["does_not_throw"],
        "Passes iff the callable completes without failing.",
    ),
];

/// Canonical spelling.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn as_str(id: AssertOp) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: AssertOp) -> &'static OperatorInfo {
    registry::find(OPERATORS, id).expect("operator info missing")
}

/// Lookup by spelling (canonical or alias).
pub fn from_str(s: &str) -> Option<AssertOp> {
    registry::lookup(OPERATORS, s)
}

const fn info(
    id: AssertOp,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> OperatorInfo {
    VocabInfo {
        id,
        canonical,
        aliases,
        description,
    }
}
