//! Fatal-fault interception.
//!
//! The interceptor turns the first runtime fault of a run into a single `not ok 0 error` record on the error stream
//! and ends the process with status 1. It is fed from four places:
//!
//! - triggered faults of any severity ([`trigger_error`], [`crate::Assert::trigger`], and harness-internal faults
//!   such as an invalid `throws` pattern or a failed write);
//! - failures escaping a group body: panics unwinding out of [`Interceptor::guard`] and `Err` values returned by a
//!   fallible body, both through [`Interceptor::handle_uncaught`];
//! - the shutdown check, which inspects the last fault that could not be dispatched immediately;
//! - exit enforcement, which turns "a fault was intercepted" into a failing exit status.
//!
//! ## Notes
//!
//! - The state only moves forward: `Armed` until the first dispatched fault, then `Tripped` for good.
//! - Faults raised on a thread other than the one that created the interceptor cannot pre-empt the harness. They are
//!   kept as the last fault (a panic is kept with severity `Error`) and looked at during shutdown, where only
//!   `Fatal error` faults are acted on.
//! - The panic hook runs for every panic, caught or not. Inside a guarded group body it only records the panic's
//!   message, location, and backtrace; the run ends only if the unwind leaves the body. A panic on the owning thread
//!   outside any guarded body trips the interceptor from the hook.
//! - Panic hooks are process-wide, so [`install`] keeps one interceptor per process. Tests that need isolation build
//!   their own with [`Interceptor::with_terminate`] and hand it to the harness through its configuration.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::io::Write;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

use just_test_core::tap;
use just_test_core::{Fault, FaultRecord, Severity, SourceLocation, UncaughtFault};
use tracing::{debug, instrument, warn};

use crate::shutdown::ExitCode;

/// Fault kind used for panics.
pub const PANIC_KIND: &str = "panic";

// ============================================================================
// Termination
// ============================================================================

/// How a tripped interceptor ends the run.
pub trait Terminate: Send + Sync {
    fn terminate(&self, code: i32) -> !;
}

/// Ends the process with [`process::exit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, code: i32) -> ! {
        process::exit(code)
    }
}

// ============================================================================
// Interceptor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptorState {
    Armed,
    Tripped,
}

struct Inner {
    state: InterceptorState,
    has_fatal_error: bool,
    last_fault: Option<FaultRecord>,
    guard_depth: usize,
    pending_panic: Option<UncaughtFault>,
    err: Box<dyn Write + Send>,
}

pub struct Interceptor {
    inner: Mutex<Inner>,
    rendering: AtomicBool,
    owner: ThreadId,
    terminate: Box<dyn Terminate>,
}

impl Interceptor {
    /// An interceptor owned by the current thread that exits the process when tripped.
    pub fn new(err: Box<dyn Write + Send>) -> Self {
        Self::with_terminate(err, Box::new(ProcessExit))
    }

    pub fn with_terminate(err: Box<dyn Write + Send>, terminate: Box<dyn Terminate>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: InterceptorState::Armed,
                has_fatal_error: false,
                last_fault: None,
                guard_depth: 0,
                pending_panic: None,
                err,
            }),
            rendering: AtomicBool::new(false),
            owner: thread::current().id(),
            terminate,
        }
    }

    pub fn state(&self) -> InterceptorState {
        self.lock().state
    }

    pub fn has_fatal_error(&self) -> bool {
        self.lock().has_fatal_error
    }

    pub fn last_fault(&self) -> Option<FaultRecord> {
        self.lock().last_fault.clone()
    }

    /// A triggered fault. On the owning thread this reports and terminates.
    #[instrument(skip_all, fields(severity = %record.severity))]
    pub fn handle_error(&self, record: FaultRecord) {
        if !self.is_owner_thread() {
            self.record_last(record);
            return;
        }
        self.trip(&record.render())
    }

    /// A failure that escaped a group body.
    #[instrument(skip_all, fields(kind = %fault.fault.kind))]
    pub fn handle_uncaught(&self, fault: &UncaughtFault) {
        if !self.is_owner_thread() {
            let location = fault.location.clone().unwrap_or_else(unknown_location);
            self.record_last(FaultRecord::new(Severity::Error, fault.fault.to_string(), location));
            return;
        }
        self.trip(&fault.render())
    }

    /// Run a group body, catching any unwind that escapes it.
    ///
    /// Panics caught inside `f` are invisible here. An escaping panic comes back as the fault recorded by the panic
    /// hook, or one built from the payload when no hook of ours saw it. Once tripped, the unwind is resumed untouched.
    pub fn guard<R>(&self, f: impl FnOnce() -> R) -> Result<R, UncaughtFault> {
        self.lock().guard_depth += 1;
        let result = panic::catch_unwind(AssertUnwindSafe(f));

        let (pending, tripped) = {
            let mut inner = self.lock();
            inner.guard_depth -= 1;
            (inner.pending_panic.take(), inner.state == InterceptorState::Tripped)
        };
        match result {
            Ok(value) => Ok(value),
            Err(payload) if tripped => panic::resume_unwind(payload),
            Err(payload) => {
                Err(pending.unwrap_or_else(|| UncaughtFault::new(Fault::new(PANIC_KIND, panic_message(&*payload)))))
            }
        }
    }

    /// Entry point for the process panic hook.
    pub fn handle_panic(&self, info: &PanicHookInfo<'_>) {
        let message = panic_message(info.payload());
        let location = info.location().map(SourceLocation::from);

        if !self.is_owner_thread() {
            let current = thread::current();
            let name = current.name().unwrap_or("<unnamed>");
            self.record_last(FaultRecord::new(
                Severity::Error,
                format!("thread '{name}' panicked: {message}"),
                location.unwrap_or_else(unknown_location),
            ));
            return;
        }

        let mut uncaught = UncaughtFault::new(Fault::new(PANIC_KIND, message)).with_trace(captured_trace());
        if let Some(location) = location {
            uncaught = uncaught.at(location);
        }
        if !self.rendering.load(Ordering::SeqCst) {
            let mut inner = self.lock();
            if inner.guard_depth > 0 {
                // Whether it escapes the body is decided by `guard`.
                inner.pending_panic = Some(uncaught);
                return;
            }
        }
        self.trip(&uncaught.render())
    }

    /// Shutdown check: act on the last undispatched fault only when it is a `Fatal error`.
    pub fn handle_fatal_at_shutdown(&self) -> ControlFlow<ExitCode> {
        let last = self.lock().last_fault.take();
        match last {
            Some(record) if record.is_fatal() => {
                debug!(message = %record.message, "fatal fault found at shutdown");
                self.report(&record.render());
                ControlFlow::Break(ExitCode::FAILURE)
            }
            Some(record) => {
                debug!(severity = %record.severity, "ignoring non-fatal fault at shutdown");
                ControlFlow::Continue(())
            }
            None => ControlFlow::Continue(()),
        }
    }

    /// Shutdown check: any intercepted fault fails the run.
    pub fn exit_on_error(&self) -> ControlFlow<ExitCode> {
        if self.has_fatal_error() {
            ControlFlow::Break(ExitCode::FAILURE)
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_last(&self, record: FaultRecord) {
        debug!(severity = %record.severity, "recording fault from non-harness thread");
        self.lock().last_fault = Some(record);
    }

    /// Write the fatal record once. Returns `false` when the interceptor had already tripped.
    fn report(&self, description: &str) -> bool {
        let mut inner = self.lock();
        inner.has_fatal_error = true;
        if inner.state == InterceptorState::Tripped {
            return false;
        }
        inner.state = InterceptorState::Tripped;

        let block = tap::fatal_block(description);
        // Nothing is left to report a broken error stream to.
        let _ = inner.err.write_all(block.as_bytes()).and_then(|()| inner.err.flush());
        true
    }

    fn trip(&self, description: &str) -> ! {
        // A second fault while the first is being rendered (a panicking writer, a racing thread) ends the run as is.
        if !self.rendering.swap(true, Ordering::SeqCst) {
            self.report(description);
        }
        self.terminate.terminate(1)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Interceptor")
            .field("state", &inner.state)
            .field("has_fatal_error", &inner.has_fatal_error)
            .field("last_fault", &inner.last_fault)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

fn unknown_location() -> SourceLocation {
    SourceLocation::new("<unknown>", 0)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

fn captured_trace() -> Vec<String> {
    let backtrace = Backtrace::capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    backtrace
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Process-wide installation
// ============================================================================

static INTERCEPTOR: OnceLock<Arc<Interceptor>> = OnceLock::new();

/// Install the process interceptor and its panic hook, or return the one already installed.
///
/// The default panic hook is replaced, so the runtime's own panic message is never printed.
pub fn install(err: Box<dyn Write + Send>) -> Arc<Interceptor> {
    Arc::clone(INTERCEPTOR.get_or_init(|| {
        let interceptor = Arc::new(Interceptor::new(err));
        let hooked = Arc::clone(&interceptor);
        panic::set_hook(Box::new(move |info| hooked.handle_panic(info)));
        debug!("fault interceptor installed");
        interceptor
    }))
}

/// The process interceptor, if [`install`] has run.
pub fn installed() -> Option<Arc<Interceptor>> {
    INTERCEPTOR.get().cloned()
}

/// Raise a runtime fault at the caller's location.
///
/// Without an installed interceptor the fault is only logged.
#[track_caller]
pub fn trigger_error(severity: Severity, message: impl Into<String>) {
    let record = FaultRecord::new(severity, message, SourceLocation::caller());
    match installed() {
        Some(interceptor) => interceptor.handle_error(record),
        None => warn!(severity = %record.severity, "{}", record.render()),
    }
}
