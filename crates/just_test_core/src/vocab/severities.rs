//! Runtime fault severity vocabulary.
//!
//! Every fault the interceptor sees carries a [`Severity`]. Severities are grouped into a smaller set of
//! [`SeverityLabel`]s, which is what the fatal diagnostic prints (`Warning: ... in file on line N`).
//!
//! ## Notes
//! - Only faults labelled [`SeverityLabel::FatalError`] are escalated when they are first noticed at shutdown.
//!   Anything else that lingers until then is dropped.
//! - [`Severity::Unknown`] exists so callers can forward a fault whose class they cannot name; it renders as
//!   `Unknown error`.
//!
//! ## Examples
//! ```rust
//! use just_test_core::vocab::severities::{Severity, SeverityLabel};
//!
//! assert_eq!(Severity::UserError.label(), SeverityLabel::FatalError);
//! assert_eq!(Severity::UserDeprecated.label().as_str(), "Deprecated");
//! ```

use std::fmt;

use super::registry::{self, VocabInfo};

/// Stable identifier for every fault severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    CoreError,
    CompileError,
    UserError,
    RecoverableError,
    Warning,
    CoreWarning,
    CompileWarning,
    UserWarning,
    Parse,
    Notice,
    UserNotice,
    Strict,
    Deprecated,
    UserDeprecated,
    Unknown,
}

/// Human-readable classification printed in fatal diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityLabel {
    FatalError,
    CatchableFatalError,
    Warning,
    ParseError,
    Notice,
    StrictStandards,
    Deprecated,
    UnknownError,
}

impl SeverityLabel {
    /// The label as printed in a fault record.
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLabel::FatalError => "Fatal error",
            SeverityLabel::CatchableFatalError => "Catchable fatal error",
            SeverityLabel::Warning => "Warning",
            SeverityLabel::ParseError => "Parse error",
            SeverityLabel::Notice => "Notice",
            SeverityLabel::StrictStandards => "Strict standards",
            SeverityLabel::Deprecated => "Deprecated",
            SeverityLabel::UnknownError => "Unknown error",
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Severity {
    /// Classify this severity.
    pub fn label(self) -> SeverityLabel {
        match self {
            Severity::Error | Severity::CoreError | Severity::CompileError | Severity::UserError => {
                SeverityLabel::FatalError
            }
            Severity::RecoverableError => SeverityLabel::CatchableFatalError,
            Severity::Warning | Severity::CoreWarning | Severity::CompileWarning | Severity::UserWarning => {
                SeverityLabel::Warning
            }
            Severity::Parse => SeverityLabel::ParseError,
            Severity::Notice | Severity::UserNotice => SeverityLabel::Notice,
            Severity::Strict => SeverityLabel::StrictStandards,
            Severity::Deprecated | Severity::UserDeprecated => SeverityLabel::Deprecated,
            Severity::Unknown => SeverityLabel::UnknownError,
        }
    }

    /// Whether a fault of this severity is escalated when first noticed at shutdown.
    pub fn is_fatal(self) -> bool {
        self.label() == SeverityLabel::FatalError
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Metadata for a severity.
pub type SeverityInfo = VocabInfo<Severity>;

/// Registry of all severities.
pub const SEVERITIES: &[SeverityInfo] = &[
    info(Severity::Error, "error", &["fatal"], "Unrecoverable runtime error."),
    info(Severity::CoreError, "core-error", &[], "Unrecoverable error raised while the runtime starts up."),
    info(Severity::CompileError, "compile-error", &[], "Unrecoverable error raised while loading test code."),
    info(Severity::UserError, "user-error", &[], "Unrecoverable error raised explicitly by test code."),
    info(
        Severity::RecoverableError,
        "recoverable-error",
        &["catchable"],
        "Error the runtime could have continued past, still fatal to the run.",
    ),
    info(Severity::Warning, "warning", &[], "Runtime warning."),
    info(Severity::CoreWarning, "core-warning", &[], "Warning raised while the runtime starts up."),
    info(Severity::CompileWarning, "compile-warning", &[], "Warning raised while loading test code."),
    info(Severity::UserWarning, "user-warning", &[], "Warning raised explicitly by test code."),
    info(Severity::Parse, "parse", &["parse-error"], "Source could not be parsed."),
    info(Severity::Notice, "notice", &[], "Runtime notice about something that may be a mistake."),
    info(Severity::UserNotice, "user-notice", &[], "Notice raised explicitly by test code."),
    info(Severity::Strict, "strict", &[], "Strict-mode advisory."),
    info(Severity::Deprecated, "deprecated", &[], "Use of a deprecated facility."),
    info(Severity::UserDeprecated, "user-deprecated", &[], "Deprecation raised explicitly by test code."),
    info(Severity::Unknown, "unknown", &[], "Fault whose class could not be determined."),
];

/// Canonical spelling.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn as_str(id: Severity) -> &'static str {
    info_for(id).canonical
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: Severity) -> &'static SeverityInfo {
    registry::find(SEVERITIES, id).expect("severity info missing")
}

/// Lookup by spelling (canonical or alias).
pub fn from_str(s: &str) -> Option<Severity> {
    registry::lookup(SEVERITIES, s)
}

const fn info(
    id: Severity,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> SeverityInfo {
    VocabInfo {
        id,
        canonical,
        aliases,
        description,
    }
}
