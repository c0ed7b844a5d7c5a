use std::collections::HashMap;

use just_test_core::vocab::operators::{self, AssertOp};
use just_test_core::vocab::severities::{self, Severity, SeverityLabel};

#[test]
fn severities_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, Severity> = HashMap::new();

    for info in severities::SEVERITIES {
        assert_eq!(
            severities::from_str(info.canonical),
            Some(info.id),
            "severity canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            severities::as_str(info.id),
            info.canonical,
            "severity as_str mismatch for {:?}",
            info.id
        );
        assert!(!info.description.is_empty(), "missing description for {:?}", info.id);

        for spelling in std::iter::once(info.canonical).chain(info.aliases.iter().copied()) {
            assert!(info.is_spelled(spelling));
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!("duplicate severity spelling {spelling:?}: {prev:?} and {:?}", info.id);
            }
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, AssertOp> = HashMap::new();

    for info in operators::OPERATORS {
        assert_eq!(operators::from_str(info.canonical), Some(info.id));
        assert_eq!(operators::as_str(info.id), info.canonical);

        for &alias in info.aliases {
            assert_eq!(operators::from_str(alias), Some(info.id), "operator alias not resolvable: {alias}");
        }
        for spelling in std::iter::once(info.canonical).chain(info.aliases.iter().copied()) {
            if let Some(prev) = seen.insert(spelling, info.id) {
                panic!("duplicate operator spelling {spelling:?}: {prev:?} and {:?}", info.id);
            }
        }
    }
}

#[test]
fn operator_spellings_match_tap_output() {
    let expected = [
        (AssertOp::Ok, "ok"),
        (AssertOp::NotOk, "notOk"),
        (AssertOp::Equals, "equals"),
        (AssertOp::NotEquals, "notEquals"),
        (AssertOp::Throws, "throws"),
        (AssertOp::DoesNotThrow, "doesNotThrow"),
    ];
    assert_eq!(operators::OPERATORS.len(), expected.len());
    for (op, spelling) in expected {
        assert_eq!(op.to_string(), spelling);
    }
}

/// Every severity maps to exactly the label the fatal diagnostic is documented to print.
#[test]
fn severity_label_table_is_exact() {
    let table = [
        (Severity::Error, "Fatal error"),
        (Severity::CoreError, "Fatal error"),
        (Severity::CompileError, "Fatal error"),
        (Severity::UserError, "Fatal error"),
        (Severity::RecoverableError, "Catchable fatal error"),
        (Severity::Warning, "Warning"),
        (Severity::CoreWarning, "Warning"),
        (Severity::CompileWarning, "Warning"),
        (Severity::UserWarning, "Warning"),
        (Severity::Parse, "Parse error"),
        (Severity::Notice, "Notice"),
        (Severity::UserNotice, "Notice"),
        (Severity::Strict, "Strict standards"),
        (Severity::Deprecated, "Deprecated"),
        (Severity::UserDeprecated, "Deprecated"),
        (Severity::Unknown, "Unknown error"),
    ];
    assert_eq!(severities::SEVERITIES.len(), table.len(), "registry and label table disagree");
    for (severity, label) in table {
        assert_eq!(severity.label().as_str(), label, "{severity:?}");
    }

    let fatal: Vec<Severity> = severities::SEVERITIES
        .iter()
        .map(|info| info.id)
        .filter(|sev| sev.label() == SeverityLabel::FatalError)
        .collect();
    assert_eq!(
        fatal,
        vec![
            Severity::Error,
            Severity::CoreError,
            Severity::CompileError,
            Severity::UserError
        ]
    );
}
