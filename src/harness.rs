//! Test groups, shared result state, and the end-of-run sequence.
//!
//! A [`Harness`] is created by the test script's `main`, runs groups one after another, and is consumed by
//! [`Harness::finish`], which prints the plan and summary and yields the exit code. Every group gets a fresh
//! [`Assert`] context, but all contexts write into the same [`HarnessState`], so result numbers keep increasing
//! across groups.
//!
//! ## Notes
//!
//! - One-time setup happens lazily on the first [`Harness::run_group`] call, skipped groups included: the interceptor
//!   is installed (when enabled) and the shutdown callbacks are registered. A harness that never ran a group
//!   finishes silently with status 0.
//! - With an interceptor, a panic unwinding out of a group body and an `Err` returned by a fallible body are both
//!   handed to it as uncaught faults; the `Err` is located at the `run_group` call site. Panics the body catches
//!   itself never get that far. Without an interceptor, panics unwind through `run_group` untouched.

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::Arc;

use just_test_core::tap::{Counts, Diagnostics, Outcome};
use just_test_core::{FaultRecord, Severity, SourceLocation, UncaughtFault};
use tracing::{debug, error, warn};

use crate::assert::Assert;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::interceptor::{self, Interceptor};
use crate::reporter::TapReporter;
use crate::shutdown::{ExitCode, ShutdownQueue};

// ============================================================================
// Group options and collaborators
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOptions {
    /// Do not run the body: no output, counters untouched.
    pub skip: bool,
}

impl GroupOptions {
    pub fn skipped() -> Self {
        Self { skip: true }
    }
}

/// Called around every group that actually runs. Coverage collectors hook in here.
pub trait GroupHook {
    fn before_group(&mut self, _name: Option<&str>) {}
    fn after_group(&mut self, _name: Option<&str>) {}
}

/// What a group body may return.
///
/// `()` for plain bodies, `Result<(), E>` for bodies that use `?`; an `Err` is an uncaught failure.
pub trait GroupOutcome {
    fn into_uncaught(self) -> Option<UncaughtFault>;
}

impl GroupOutcome for () {
    fn into_uncaught(self) -> Option<UncaughtFault> {
        None
    }
}

impl<E: Error> GroupOutcome for Result<(), E> {
    fn into_uncaught(self) -> Option<UncaughtFault> {
        self.err().map(|err| UncaughtFault::from_error(&err))
    }
}

// ============================================================================
// Shared state
// ============================================================================

/// Counters, output, and fault routing shared by every [`Assert`] of one harness.
pub struct HarnessState {
    reporter: RefCell<TapReporter>,
    interceptor: RefCell<Option<Arc<Interceptor>>>,
    uncaught: Cell<bool>,
}

impl HarnessState {
    fn new(reporter: TapReporter) -> Self {
        Self {
            reporter: RefCell::new(reporter),
            interceptor: RefCell::new(None),
            uncaught: Cell::new(false),
        }
    }

    pub fn counts(&self) -> Counts {
        self.reporter.borrow().counts()
    }

    /// Count and print one result; returns whether it passed.
    #[track_caller]
    pub(crate) fn record(&self, outcome: Outcome, message: &str, diagnostics: Option<&Diagnostics>) -> bool {
        let written = self.reporter.borrow_mut().record(outcome, message, diagnostics);
        if let Err(err) = written {
            self.raise_io(err);
        }
        outcome == Outcome::Pass
    }

    #[track_caller]
    fn comment(&self, text: &str) {
        let written = self.reporter.borrow_mut().comment(text);
        if let Err(err) = written {
            self.raise_io(err);
        }
    }

    #[track_caller]
    fn raise_io(&self, err: io::Error) {
        let message = HarnessError::Io(err).to_string();
        self.raise(FaultRecord::new(Severity::Warning, message, SourceLocation::caller()));
    }

    /// Route a runtime fault to the interceptor, or log it when interception is off.
    pub(crate) fn raise(&self, record: FaultRecord) {
        match self.interceptor() {
            Some(interceptor) => interceptor.handle_error(record),
            None => warn!(severity = %record.severity, "{}", record.render()),
        }
    }

    fn raise_uncaught(&self, fault: UncaughtFault) {
        match self.interceptor() {
            Some(interceptor) => interceptor.handle_uncaught(&fault),
            None => {
                error!("uncaught failure in test group: {}", fault.render());
                self.uncaught.set(true);
            }
        }
    }

    fn interceptor(&self) -> Option<Arc<Interceptor>> {
        self.interceptor.borrow().clone()
    }

    fn emit_summary(&self) -> ExitCode {
        let written = self.reporter.borrow_mut().summary();
        if let Err(err) = written {
            self.raise_io(err);
        }
        if self.counts().has_failures() || self.uncaught.get() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl fmt::Debug for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessState")
            .field("counts", &self.counts())
            .field("intercepting", &self.interceptor.borrow().is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    state: Rc<HarnessState>,
    intercept_faults: bool,
    stderr: Option<Box<dyn Write + Send>>,
    injected: Option<Arc<Interceptor>>,
    hook: Option<Box<dyn GroupHook>>,
    shutdown: ShutdownQueue,
    initialized: bool,
}

impl Harness {
    /// A harness writing to the real stdout/stderr with interception enabled.
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    pub fn with_config(config: HarnessConfig) -> Self {
        Self {
            state: Rc::new(HarnessState::new(TapReporter::new(config.stdout))),
            intercept_faults: config.intercept_faults,
            stderr: Some(config.stderr),
            injected: config.interceptor,
            hook: config.hook,
            shutdown: ShutdownQueue::new(),
            initialized: false,
        }
    }

    pub fn counts(&self) -> Counts {
        self.state.counts()
    }

    fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let interceptor = match self.injected.take() {
            Some(injected) => Some(injected),
            None if self.intercept_faults => {
                let err = self.stderr.take().unwrap_or_else(|| Box::new(io::stderr()));
                Some(interceptor::install(err))
            }
            None => None,
        };

        if let Some(interceptor) = &interceptor {
            let fatal = Arc::clone(interceptor);
            self.shutdown.register("fatal-check", move || fatal.handle_fatal_at_shutdown());
            let enforce = Arc::clone(interceptor);
            self.shutdown.register("exit-on-error", move || enforce.exit_on_error());
        }
        *self.state.interceptor.borrow_mut() = interceptor;

        let state = Rc::clone(&self.state);
        self.shutdown.register("summary", move || ControlFlow::Break(state.emit_summary()));
        debug!(callbacks = self.shutdown.len(), "harness initialized");
    }

    /// Run one group. An empty name counts as no name.
    #[track_caller]
    pub fn run_group<R: GroupOutcome>(
        &mut self,
        name: Option<&str>,
        options: GroupOptions,
        body: impl FnOnce(&Assert<'_>) -> R,
    ) {
        let location = SourceLocation::caller();
        let name = name.filter(|name| !name.is_empty());
        let _span = tracing::debug_span!("group", name = name.unwrap_or_default()).entered();

        self.init();
        if options.skip {
            debug!("skipping group");
            return;
        }

        if let Some(name) = name {
            self.state.comment(name);
        }
        if let Some(hook) = self.hook.as_mut() {
            hook.before_group(name);
        }

        let assert = Assert::new(&self.state);
        let outcome = match self.state.interceptor() {
            Some(interceptor) => match interceptor.guard(|| body(&assert)) {
                Ok(outcome) => outcome,
                Err(fault) => {
                    let fault = if fault.location.is_some() { fault } else { fault.at(location) };
                    interceptor.handle_uncaught(&fault);
                    return;
                }
            },
            None => body(&assert),
        };

        if let Some(hook) = self.hook.as_mut() {
            hook.after_group(name);
        }
        if let Some(fault) = outcome.into_uncaught() {
            self.state.raise_uncaught(fault.at(location));
        }
    }

    #[track_caller]
    pub fn group<R: GroupOutcome>(&mut self, name: &str, body: impl FnOnce(&Assert<'_>) -> R) {
        self.run_group(Some(name), GroupOptions::default(), body)
    }

    #[track_caller]
    pub fn anonymous<R: GroupOutcome>(&mut self, body: impl FnOnce(&Assert<'_>) -> R) {
        self.run_group(None, GroupOptions::default(), body)
    }

    #[track_caller]
    pub fn skip<R: GroupOutcome>(&mut self, name: &str, body: impl FnOnce(&Assert<'_>) -> R) {
        self.run_group(Some(name), GroupOptions::skipped(), body)
    }

    /// Run the shutdown callbacks and return the exit code for the run.
    pub fn finish(mut self) -> ExitCode {
        self.shutdown.run()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("state", &self.state)
            .field("intercept_faults", &self.intercept_faults)
            .field("shutdown", &self.shutdown)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
