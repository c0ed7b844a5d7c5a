//! TAP output for one harness run.
//!
//! The reporter owns the result counters and the output stream. Every call renders its lines with
//! [`just_test_core::tap`] and writes them out with a flush, so a process that dies mid-run leaves a complete
//! prefix of the stream behind.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use just_test_core::tap::{self, Counts, Diagnostics, Outcome};

/// Writes TAP lines and keeps the running totals.
pub struct TapReporter {
    out: Box<dyn Write + Send>,
    counts: Counts,
}

impl TapReporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            counts: Counts::default(),
        }
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// `# {text}`
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        let line = tap::comment_line(text);
        self.emit(&format!("{line}\n"))
    }

    /// Count one result, then print its line and optional diagnostic block.
    ///
    /// The counters are updated before anything is written, so the totals stay right even when the stream fails.
    pub fn record(&mut self, outcome: Outcome, message: &str, diagnostics: Option<&Diagnostics>) -> io::Result<usize> {
        let number = self.counts.record(outcome);
        let mut text = tap::result_line(outcome, number, message);
        text.push('\n');
        if let Some(diagnostics) = diagnostics {
            text.push_str(&tap::diagnostic_block(diagnostics));
        }
        self.emit(&text)?;
        Ok(number)
    }

    /// Plan line and totals.
    pub fn summary(&mut self) -> io::Result<()> {
        let block = tap::summary_block(&self.counts);
        self.emit(&block)
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl fmt::Debug for TapReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapReporter").field("counts", &self.counts).finish_non_exhaustive()
    }
}

/// An in-memory sink that can be handed to the harness and read back afterwards.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
