//! Fault scenarios for end-to-end checks of the process contract.
//!
//! Each scenario is a short script whose stdout, stderr, and exit status are fixed:
//!
//! | Scenario | Exit | Stderr |
//! |---|---|---|
//! | `all-pass` | 0 | empty |
//! | `skipped` | 0 | empty |
//! | `panic` | 1 | fatal record for the panic, no plan on stdout |
//! | `caught-panic` | 0 | empty; the body catches its own panic and carries on |
//! | `error-body` | 1 | fatal record for the returned error |
//! | `warning` | 1 | `Warning: ...` record |
//! | `notice` | 1 | `Notice: ...` record |
//! | `user-error` | 1 | `Fatal error: ...` record |
//! | `bad-pattern` | 1 | `Warning: invalid expected-exception pattern ...` record |
//! | `worker-panic` | 1 | `Fatal error: thread 'worker' panicked: ...` record, written at shutdown |
//! | `worker-warning` | 0 | empty; the warning is dropped at shutdown |

use std::panic;
use std::thread;

use clap::ValueEnum;
use just_test_core::Severity;
use thiserror::Error;

use crate::harness::Harness;
use crate::interceptor::trigger_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    AllPass,
    Skipped,
    Panic,
    CaughtPanic,
    ErrorBody,
    Warning,
    Notice,
    UserError,
    BadPattern,
    WorkerPanic,
    WorkerWarning,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("the fixture could not be loaded")]
    FixtureMissing,
}

pub fn run(scenario: Scenario, harness: &mut Harness) {
    match scenario {
        Scenario::AllPass => {
            harness.group("everything passes", |t| {
                t.ok(true, "true is ok");
                t.equals(1, "1", "loosely equal");
            });
        }
        Scenario::Skipped => {
            harness.skip("not today", |t| {
                t.fail("never printed");
            });
            harness.group("runs", |t| {
                t.pass("still counted");
            });
        }
        Scenario::Panic => {
            harness.group("panics midway", |t| {
                t.pass("before the panic");
                explode("boom");
            });
        }
        Scenario::CaughtPanic => {
            harness.group("caught panic", |t| {
                let caught = panic::catch_unwind(|| explode("handled inside the body"));
                t.ok(caught.is_err(), "the panic was caught");
                t.pass("run continues");
            });
        }
        Scenario::ErrorBody => {
            harness.group("returns an error", |t| -> Result<(), ScenarioError> {
                t.pass("before the error");
                Err(ScenarioError::FixtureMissing)
            });
        }
        Scenario::Warning => {
            harness.group("warns", |t| {
                t.pass("before the warning");
                t.trigger(Severity::UserWarning, "disk almost full");
                t.pass("never printed");
            });
        }
        Scenario::Notice => {
            harness.group("notices", |t| {
                t.pass("before the notice");
                trigger_error(Severity::UserNotice, "undefined index: name");
            });
        }
        Scenario::UserError => {
            harness.group("gives up", |t| {
                t.trigger(Severity::UserError, "giving up");
            });
        }
        Scenario::BadPattern => {
            harness.group("bad pattern", |t| {
                t.throws(|| Err::<(), _>(ScenarioError::FixtureMissing), "/(unclosed/", "never printed");
            });
        }
        Scenario::WorkerPanic => {
            harness.group("worker panics", |t| {
                let worker = thread::Builder::new().name("worker".to_string()).spawn(|| explode("worker gave up"));
                if let Ok(handle) = worker {
                    let _ = handle.join();
                }
                t.pass("main thread carries on");
            });
        }
        Scenario::WorkerWarning => {
            harness.group("worker warns", |t| {
                let worker = thread::Builder::new().name("worker".to_string()).spawn(|| {
                    trigger_error(Severity::Warning, "worker is slow");
                });
                if let Ok(handle) = worker {
                    let _ = handle.join();
                }
                t.pass("main thread carries on");
            });
        }
    }
}

/// One passing assertion, then a fault of `severity`.
pub fn raise(harness: &mut Harness, severity: Severity, message: &str) {
    harness.group("raise", |t| {
        t.pass("before the fault");
        t.trigger(severity, message);
    });
}

#[track_caller]
fn explode(message: &str) {
    panic!("{message}");
}
