//! Cross-process tests for the `just-test` binary.
//!
//! Exit codes, the fatal record on stderr, and the panic hook are process-level behavior, so these tests spawn the
//! binary once per scenario and inspect what it left behind.

use std::process::Command;

struct Run {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn just_test(args: &[&str]) -> Run {
    let bin = env!("CARGO_BIN_EXE_just-test");
    let output = Command::new(bin)
        .args(args)
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .env_remove("JUST_TEST_INTERCEPT")
        .env("JUST_TEST_LOG", "off")
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin} {args:?}: {e}"));

    Run {
        code: output.status.code(),
        stdout: String::from_utf8(output.stdout).expect("stdout is valid UTF-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr is valid UTF-8"),
    }
}

fn scenario(name: &str) -> Run {
    just_test(&["scenario", name])
}

/// The single indented line inside the fatal record.
fn fatal_description(stderr: &str) -> &str {
    let body = stderr
        .strip_prefix("not ok 0 error\n  ---\n    ")
        .unwrap_or_else(|| panic!("stderr is not a fatal record: {stderr:?}"));
    body.strip_suffix("\n  ...\n")
        .unwrap_or_else(|| panic!("fatal record is not terminated: {stderr:?}"))
}

// ---------------------------------------------------------------------------
// Canonical script
// ---------------------------------------------------------------------------

#[test]
fn selftest_reports_seven_of_fourteen() {
    let run = just_test(&["selftest"]);
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stderr, "");
    assert!(run.stdout.starts_with("# ok does the proper checks\nnot ok 1 false cannot be okay, okay\n"));
    assert!(run.stdout.ends_with("\n1..14\n# tests 14\n# pass  7\n# fail  7\n\n"));
}

// ---------------------------------------------------------------------------
// Clean runs
// ---------------------------------------------------------------------------

#[test]
fn all_pass_exits_zero() {
    let run = scenario("all-pass");
    assert_eq!(run.code, Some(0));
    assert_eq!(run.stderr, "");
    assert_eq!(
        run.stdout,
        "# everything passes\nok 1 true is ok\nok 2 loosely equal\n\n1..2\n# tests 2\n# pass  2\n\n# ok\n\n"
    );
}

#[test]
fn skipped_group_leaves_no_trace() {
    let run = scenario("skipped");
    assert_eq!(run.code, Some(0));
    assert!(!run.stdout.contains("not today"));
    assert!(!run.stdout.contains("never printed"));
    assert!(run.stdout.starts_with("# runs\nok 1 still counted\n"));
}

// ---------------------------------------------------------------------------
// Faults on the harness thread
// ---------------------------------------------------------------------------

#[test]
fn panic_is_reported_without_a_plan() {
    let run = scenario("panic");
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stdout, "# panics midway\nok 1 before the panic\n");

    let description = fatal_description(&run.stderr);
    assert!(description.starts_with("exception 'panic' with message 'boom' in "), "{description}");
    assert!(description.contains("scenarios.rs:"), "{description}");
    // The default hook's "thread 'main' panicked" message is suppressed.
    assert!(!run.stderr.contains("panicked"));
}

#[test]
fn panic_caught_inside_the_body_is_not_a_fault() {
    let run = scenario("caught-panic");
    assert_eq!(run.code, Some(0));
    assert_eq!(run.stderr, "");
    assert_eq!(
        run.stdout,
        "# caught panic\nok 1 the panic was caught\nok 2 run continues\n\n1..2\n# tests 2\n# pass  2\n\n# ok\n\n"
    );
}

#[test]
fn err_body_is_reported() {
    let run = scenario("error-body");
    assert_eq!(run.code, Some(1));
    assert!(!run.stdout.contains("1.."));
    let description = fatal_description(&run.stderr);
    assert!(description.starts_with(
        "exception 'ScenarioError' with message 'the fixture could not be loaded' in "
    ));
}

#[test]
fn warning_stops_the_run() {
    let run = scenario("warning");
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stdout, "# warns\nok 1 before the warning\n");
    let description = fatal_description(&run.stderr);
    assert!(description.starts_with("Warning: disk almost full in "), "{description}");
    assert!(description.contains("scenarios.rs on line "), "{description}");
}

#[test]
fn notice_from_free_function_stops_the_run() {
    let run = scenario("notice");
    assert_eq!(run.code, Some(1));
    assert!(fatal_description(&run.stderr).starts_with("Notice: undefined index: name in "));
}

#[test]
fn user_error_is_fatal() {
    let run = scenario("user-error");
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stdout, "# gives up\n");
    assert!(fatal_description(&run.stderr).starts_with("Fatal error: giving up in "));
}

#[test]
fn bad_pattern_is_a_warning() {
    let run = scenario("bad-pattern");
    assert_eq!(run.code, Some(1));
    assert!(fatal_description(&run.stderr).starts_with("Warning: invalid expected-exception pattern '/(unclosed/':"));
}

#[test]
fn raise_labels_each_severity() {
    for (severity, label) in [
        ("deprecated", "Deprecated"),
        ("strict", "Strict standards"),
        ("recoverable-error", "Catchable fatal error"),
        ("parse-error", "Parse error"),
        ("unknown", "Unknown error"),
    ] {
        let run = just_test(&["raise", severity, "old api"]);
        assert_eq!(run.code, Some(1), "{severity}");
        assert_eq!(run.stdout, "# raise\nok 1 before the fault\n");
        let description = fatal_description(&run.stderr);
        assert!(description.starts_with(&format!("{label}: old api in ")), "{severity}: {description}");
    }
}

// ---------------------------------------------------------------------------
// Faults on other threads
// ---------------------------------------------------------------------------

#[test]
fn worker_panic_is_reported_at_shutdown() {
    let run = scenario("worker-panic");
    assert_eq!(run.code, Some(1));
    assert_eq!(run.stdout, "# worker panics\nok 1 main thread carries on\n");
    let description = fatal_description(&run.stderr);
    assert!(
        description.starts_with("Fatal error: thread 'worker' panicked: worker gave up in "),
        "{description}"
    );
}

#[test]
fn worker_warning_is_dropped() {
    let run = scenario("worker-warning");
    assert_eq!(run.code, Some(0));
    assert_eq!(run.stderr, "");
    assert!(run.stdout.ends_with("\n# ok\n\n"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn invalid_intercept_setting_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_just-test"))
        .arg("selftest")
        .env("JUST_TEST_INTERCEPT", "sometimes")
        .output()
        .expect("spawn just-test");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "Error: invalid value 'sometimes' for JUST_TEST_INTERCEPT\n"
    );
}

#[test]
fn disabling_interception_keeps_the_default_panic_output() {
    let output = Command::new(env!("CARGO_BIN_EXE_just-test"))
        .args(["scenario", "panic"])
        .env("JUST_TEST_INTERCEPT", "0")
        .env("JUST_TEST_LOG", "off")
        .output()
        .expect("spawn just-test");
    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("not ok 0 error"));
    assert!(stderr.contains("boom"));
}
