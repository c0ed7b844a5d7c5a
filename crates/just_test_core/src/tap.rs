//! TAP line rendering.
//!
//! Pure string builders for every line the harness prints. Functions that build a single line return it without a
//! trailing newline; functions that build a block return every line newline-terminated.
//!
//! ## Notes
//! - A result message is printed verbatim after the number, so an empty message leaves a trailing space
//!   (`ok 3 `). TAP consumers ignore it.
//! - The fatal record uses test number `0` so it can never collide with a real result.

use crate::faults::SourceLocation;
use crate::values::{self, Value};
use crate::vocab::operators::AssertOp;

/// Header line of the fatal record written to the error stream.
pub const FATAL_RECORD_HEADER: &str = "not ok 0 error";

/// Result of a single assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

/// Running totals; `passed + failed == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Counts {
    /// Count one result and return its TAP number (1-based).
    pub fn record(&mut self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
        }
        self.total += 1;
        self.total
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Failure details printed under a `not ok` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub operator: String,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
    pub at: SourceLocation,
}

impl Diagnostics {
    pub fn new(operator: impl Into<String>, at: SourceLocation) -> Self {
        Self {
            operator: operator.into(),
            expected: None,
            actual: None,
            at,
        }
    }

    /// Diagnostics for one of the built-in assertions.
    pub fn for_op(op: AssertOp, at: SourceLocation) -> Self {
        Self::new(op.as_str(), at)
    }

    pub fn expected(mut self, value: impl Into<Value>) -> Self {
        self.expected = Some(value.into());
        self
    }

    pub fn actual(mut self, value: impl Into<Value>) -> Self {
        self.actual = Some(value.into());
        self
    }
}

/// `ok {n} {message}` or `not ok {n} {message}`
pub fn result_line(outcome: Outcome, number: usize, message: &str) -> String {
    match outcome {
        Outcome::Pass => format!("ok {number} {message}"),
        Outcome::Fail => format!("not ok {number} {message}"),
    }
}

/// `# {text}`
pub fn comment_line(text: &str) -> String {
    format!("# {text}")
}

/// The indented YAML-ish block printed after a failed result.
///
/// A missing `expected` or `actual` renders as `null`.
pub fn diagnostic_block(diagnostics: &Diagnostics) -> String {
    format!(
        "  ---\n    operator: {}\n    expected: {}\n    actual:   {}\n    at: {}\n  ...\n",
        diagnostics.operator,
        values::format_optional(diagnostics.expected.as_ref()),
        values::format_optional(diagnostics.actual.as_ref()),
        diagnostics.at,
    )
}

/// Plan line and summary counts, printed once at the end of a run.
pub fn summary_block(counts: &Counts) -> String {
    let mut out = format!(
        "\n1..{total}\n# tests {total}\n# pass  {passed}\n",
        total = counts.total,
        passed = counts.passed,
    );
    if counts.has_failures() {
        out.push_str(&format!("# fail  {}\n\n", counts.failed));
    } else {
        out.push_str("\n# ok\n\n");
    }
    out
}

/// The synthetic failure written to the error stream when a runtime fault ends the run.
///
/// Continuation lines of a multi-line description are indented to stay inside the block.
pub fn fatal_block(description: &str) -> String {
    format!(
        "{FATAL_RECORD_HEADER}\n  ---\n    {}\n  ...\n",
        description.replace('\n', "\n    ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn here() -> SourceLocation {
        SourceLocation::new("tests/some_tests.rs", 12)
    }

    #[test]
    fn test_counts_number_results_from_one() {
        let mut counts = Counts::default();
        assert_eq!(counts.record(Outcome::Fail), 1);
        assert_eq!(counts.record(Outcome::Pass), 2);
        assert_eq!(counts.record(Outcome::Pass), 3);
        assert_eq!(
            counts,
            Counts {
                total: 3,
                passed: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_result_lines() {
        assert_eq!(result_line(Outcome::Pass, 7, ""), "ok 7 ");
        assert_eq!(result_line(Outcome::Fail, 8, "should fail"), "not ok 8 should fail");
        assert_eq!(comment_line("equals"), "# equals");
    }

    #[test]
    fn test_diagnostic_block_both_sides() {
        let diagnostics = Diagnostics::for_op(AssertOp::Equals, here()).expected(1).actual(0);
        let rendered = format!(
            "{}\n{}",
            result_line(Outcome::Fail, 2, "should fail"),
            diagnostic_block(&diagnostics)
        );
        insta::assert_snapshot!(rendered, @r"
        not ok 2 should fail
          ---
            operator: equals
            expected: 1
            actual:   0
            at: tests/some_tests.rs:12
          ...
        ");
    }

    #[test]
    fn test_diagnostic_block_missing_expected_renders_null() {
        let diagnostics = Diagnostics::for_op(AssertOp::NotEquals, here()).actual(json!([1, 2]));
        let block = diagnostic_block(&diagnostics);
        assert!(block.contains("    expected: null\n"));
        assert!(block.contains("    actual:   [1,2]\n"));
        assert!(block.starts_with("  ---\n"));
        assert!(block.ends_with("  ...\n"));
    }

    #[test]
    fn test_summary_with_failures() {
        let counts = Counts {
            total: 14,
            passed: 7,
            failed: 7,
        };
        assert_eq!(
            summary_block(&counts),
            "\n1..14\n# tests 14\n# pass  7\n# fail  7\n\n"
        );
    }

    #[test]
    fn test_summary_all_passed() {
        let counts = Counts {
            total: 2,
            passed: 2,
            failed: 0,
        };
        assert_eq!(summary_block(&counts), "\n1..2\n# tests 2\n# pass  2\n\n# ok\n\n");
    }

    #[test]
    fn test_fatal_block_indents_continuation_lines() {
        insta::assert_snapshot!(fatal_block("exception 'panic' with message 'boom'\nStack trace:\n#0 main"), @r"
        not ok 0 error
          ---
            exception 'panic' with message 'boom'
            Stack trace:
            #0 main
          ...
        ");
    }
}
