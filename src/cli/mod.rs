//! CLI module for just-test
//!
//! The binary runs built-in scripts against the harness. It is how the harness checks itself end to end: the
//! process-level behavior (exit codes, the fatal record on stderr, the panic hook) can only be observed from outside.
//!
//! ## Commands
//!
//! - `selftest` - Run the canonical example script (fourteen assertions, half of them failing on purpose)
//! - `scenario <name>` - Run one fault scenario
//! - `raise <severity> [message]` - Raise one runtime fault of the given severity mid-group
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod scenarios;
pub mod selftest;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand};
use just_test_core::Severity;
use just_test_core::vocab::severities;

use crate::config::HarnessConfig;
use crate::harness::Harness;
use crate::logging;
pub use crate::shutdown::ExitCode;
use scenarios::Scenario;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Exit code for configuration problems, distinct from a failing test run.
const USAGE_ERROR: i32 = 2;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A TAP test harness
#[derive(Parser, Debug)]
#[command(name = "just-test")]
#[command(version = VERSION)]
#[command(about = "A TAP test harness with fail-fast fault interception", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the canonical example script
    Selftest,

    /// Run a named fault scenario
    Scenario {
        /// Scenario to run
        #[arg(value_enum, value_name = "NAME")]
        name: Scenario,
    },

    /// Raise one runtime fault of the given severity
    Raise {
        /// Severity name (e.g. `user-warning`, `fatal`, `deprecated`)
        #[arg(value_name = "SEVERITY", value_parser = parse_severity)]
        severity: Severity,
        /// Fault message
        #[arg(value_name = "MESSAGE", default_value = "raised from the command line")]
        message: String,
    },
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    severities::from_str(s).ok_or_else(|| format!("unknown severity '{s}'"))
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called for ordinary results. (A tripped interceptor exits on
/// its own, from wherever the fault was raised.)
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if !exit_code.is_success() {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = HarnessConfig::from_env().map_err(|e| CliError::with_code(format!("Error: {e}"), USAGE_ERROR))?;
    logging::init(&config).map_err(|e| CliError::with_code(format!("Error: {e}"), USAGE_ERROR))?;

    let mut harness = Harness::with_config(config);
    match cli.command {
        Command::Selftest => selftest::run(&mut harness),
        Command::Scenario { name } => scenarios::run(name, &mut harness),
        Command::Raise { severity, message } => scenarios::raise(&mut harness, severity, &message),
    }
    Ok(harness.finish())
}

// ============================================================================
// Tests
// ============================================================================
