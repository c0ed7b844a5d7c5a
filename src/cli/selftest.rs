//! The canonical example script.
//!
//! Eight groups, fourteen assertions: seven pass and seven fail on purpose, so a run ends with
//! `1..14`, `# pass  7`, `# fail  7` and exit status 1.

use thiserror::Error;

use crate::harness::Harness;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct Exception(pub &'static str);

pub fn run(harness: &mut Harness) {
    harness.group("ok does the proper checks", |t| {
        t.ok(false, "false cannot be okay, okay");
        t.ok(true, "true should be okay");
    });

    harness.group("pass lets the test pass", |t| {
        t.pass("all good");
    });

    harness.group("fail actually fails", |t| {
        t.fail("such a good fail");
    });

    harness.group("notOk checks for falsey", |t| {
        t.not_ok(false, "false is not okay");
        t.not_ok(true, "true is okay");
    });

    harness.group("throws looks for exceptions", |t| {
        t.throws(|| Ok::<_, Exception>(true), "/Exception/", "you should have thrown an exception bruv");
        t.throws(|| Err::<bool, _>(Exception("Aww yea")), "/Exception/", "there you go");
    });

    harness.group("doesNotThrow should check exceptions are not thrown", |t| {
        t.does_not_throw(|| Ok::<_, Exception>(true), "looks good");
        t.does_not_throw(
            || Err::<bool, _>(Exception("Aww yea")),
            "you shouldn't have thrown an exception mate",
        );
    });

    harness.group("equals", |t| {
        t.equals(1, 1, "should be good");
        t.equals(0, 1, "should fail");
    });

    harness.group("not equals", |t| {
        t.not_equals(0, 1, "should be good");
        t.not_equals(1, 1, "should fail");
    });
}
