//! Ordered end-of-run callbacks.
//!
//! The harness registers its callbacks once, on the first group, and runs them from [`crate::Harness::finish`]:
//! the fatal-fault check, then exit enforcement, then the summary. A callback that breaks with an exit code ends the
//! run and the callbacks after it never execute.

use std::fmt;
use std::ops::ControlFlow;

use tracing::debug;

/// Process exit status produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Statuses outside u8 cannot be expressed portably; they collapse to a generic failure.
        u8::try_from(code.0).map_or(std::process::ExitCode::FAILURE, std::process::ExitCode::from)
    }
}

type Callback = Box<dyn FnOnce() -> ControlFlow<ExitCode>>;

/// Callbacks run in registration order.
#[derive(Default)]
pub struct ShutdownQueue {
    callbacks: Vec<(&'static str, Callback)>,
}

impl ShutdownQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, callback: impl FnOnce() -> ControlFlow<ExitCode> + 'static) {
        self.callbacks.push((name, Box::new(callback)));
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Drain the queue. The first `Break` wins; an empty or fully continuing queue is a success.
    pub fn run(&mut self) -> ExitCode {
        for (name, callback) in self.callbacks.drain(..) {
            debug!(callback = name, "running shutdown callback");
            if let ControlFlow::Break(code) = callback() {
                debug!(callback = name, code = code.0, "shutdown stopped");
                return code;
            }
        }
        ExitCode::SUCCESS
    }
}

impl fmt::Debug for ShutdownQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.callbacks.iter().map(|(name, _)| *name).collect();
        f.debug_struct("ShutdownQueue").field("callbacks", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_order_until_break() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut queue = ShutdownQueue::new();
        for (name, flow) in [
            ("first", ControlFlow::Continue(())),
            ("second", ControlFlow::Break(ExitCode(3))),
            ("third", ControlFlow::Continue(())),
        ] {
            let seen = Rc::clone(&seen);
            queue.register(name, move || {
                seen.borrow_mut().push(name);
                flow
            });
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.run(), ExitCode(3));
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue_succeeds() {
        assert_eq!(ShutdownQueue::new().run(), ExitCode::SUCCESS);
    }
}
