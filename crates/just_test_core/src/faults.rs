//! Fault descriptions: what a raised error, an intercepted runtime fault, or an uncaught failure renders as.
//!
//! ## Notes
//! - [`Fault`] is the `{kind, message}` value a fault boundary produces; its `Display` is the description that
//!   `throws` matches patterns against: `exception '<Kind>' with message '<msg>'`.
//! - [`FaultRecord`] is a runtime fault with a severity and a source location (`Warning: ... in file on line N`).
//! - [`UncaughtFault`] is a failure that escaped a test body; it renders with an optional location and trace.

use std::error::Error;
use std::fmt;
use std::panic::Location;

use crate::vocab::severities::{Severity, SeverityLabel};

/// A `file:line` source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Capture the location of the (tracked) caller.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A raised error reduced to its kind and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: String,
    pub message: String,
}

impl Fault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Describe an error value by its static type and `Display` text.
    ///
    /// ## Examples
    /// ```rust
    /// use just_test_core::Fault;
    ///
    /// let err = "12x".parse::<u32>().unwrap_err();
    /// let fault = Fault::from_error(&err);
    /// assert_eq!(fault.to_string(), "exception 'ParseIntError' with message 'invalid digit found in string'");
    /// ```
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        Self::new(kind_name::<E>(), err.to_string())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exception '{}' with message '{}'", self.kind, self.message)
    }
}

/// Short type name with module paths stripped from every path segment.
///
/// `alloc::boxed::Box<dyn core::error::Error>` becomes `Box<dyn Error>`.
pub fn kind_name<T: ?Sized>() -> String {
    short_type_name(std::any::type_name::<T>())
}

fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            push_last_segment(&mut out, &path);
            path.clear();
            out.push(ch);
        }
    }
    push_last_segment(&mut out, &path);
    out
}

fn push_last_segment(out: &mut String, path: &str) {
    out.push_str(path.rsplit("::").next().unwrap_or(path));
}

/// A runtime fault observed by the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl FaultRecord {
    pub fn new(severity: Severity, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
        }
    }

    pub fn label(&self) -> SeverityLabel {
        self.severity.label()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity.is_fatal()
    }

    /// `{Label}: {message} in {file} on line {line}`
    pub fn render(&self) -> String {
        format!(
            "{}: {} in {} on line {}",
            self.label(),
            self.message,
            self.location.file,
            self.location.line
        )
    }
}

/// A failure that escaped a test body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncaughtFault {
    pub fault: Fault,
    pub location: Option<SourceLocation>,
    pub trace: Vec<String>,
}

impl UncaughtFault {
    pub fn new(fault: Fault) -> Self {
        Self {
            fault,
            location: None,
            trace: Vec::new(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    /// Describe an error value; its `source()` chain becomes the trace.
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut trace = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push(format!("caused by: {cause}"));
            source = cause.source();
        }
        Self::new(Fault::from_error(err)).with_trace(trace)
    }

    /// Full multi-line description: header, location, then a numbered trace.
    pub fn render(&self) -> String {
        let mut out = self.fault.to_string();
        if let Some(location) = &self.location {
            out.push_str(&format!(" in {location}"));
        }
        if !self.trace.is_empty() {
            out.push_str("\nStack trace:");
            for (i, frame) in self.trace.iter().enumerate() {
                out.push_str(&format!("\n#{i} {frame}"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Exception(&'static str);

    impl fmt::Display for Exception {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl Error for Exception {}

    #[derive(Debug)]
    struct Wrapper(Exception);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("wrapped")
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_fault_description() {
        let fault = Fault::from_error(&Exception("Aww yea"));
        assert_eq!(fault.kind, "Exception");
        assert_eq!(fault.to_string(), "exception 'Exception' with message 'Aww yea'");
    }

    #[test]
    fn test_short_type_name_strips_nested_paths() {
        assert_eq!(
            short_type_name("alloc::boxed::Box<dyn core::error::Error + core::marker::Send>"),
            "Box<dyn Error + Send>"
        );
        assert_eq!(short_type_name("my_crate::errors::Exception"), "Exception");
        assert_eq!(kind_name::<std::num::ParseIntError>(), "ParseIntError");
    }

    #[test]
    fn test_fault_record_render() {
        let record = FaultRecord::new(Severity::UserNotice, "careful", SourceLocation::new("tests/a.rs", 7));
        assert_eq!(record.render(), "Notice: careful in tests/a.rs on line 7");
        assert!(!record.is_fatal());
    }

    #[test]
    fn test_uncaught_render_with_source_chain() {
        let uncaught = UncaughtFault::from_error(&Wrapper(Exception("root cause")))
            .at(SourceLocation::new("src/lib.rs", 3));
        assert_eq!(
            uncaught.render(),
            "exception 'Wrapper' with message 'wrapped' in src/lib.rs:3\nStack trace:\n#0 caused by: root cause"
        );
    }

    #[test]
    fn test_caller_location_points_here() {
        let here = SourceLocation::caller();
        assert!(here.file.ends_with("faults.rs"));
        assert!(here.line > 0);
    }
}
