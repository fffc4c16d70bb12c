//! Host I/O seam for `print` and `input`.
//!
//! A tiny trait the evaluator is generic over, so tests can capture output
//! instead of writing to real stdio.

use crate::error::HostIoError;

/// Where `print` output goes.
pub trait PrintWriter {
    /// # Errors
    /// Returns [`HostIoError`] if the underlying sink fails.
    fn print_line(&mut self, text: &str) -> Result<(), HostIoError>;
}

/// Writes to the process's real stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn print_line(&mut self, text: &str) -> Result<(), HostIoError> {
        println!("{text}");
        Ok(())
    }
}

/// Collects every line into an in-memory buffer, newline-joined.
///
/// Used by tests that need to assert on what a program printed.
#[derive(Debug, Default)]
pub struct CollectStringPrint {
    pub lines: Vec<String>,
}

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

impl PrintWriter for CollectStringPrint {
    fn print_line(&mut self, text: &str) -> Result<(), HostIoError> {
        self.lines.push(text.to_string());
        Ok(())
    }
}

/// Discards everything printed.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn print_line(&mut self, _text: &str) -> Result<(), HostIoError> {
        Ok(())
    }
}

/// Where `input` reads a line from.
pub trait InputReader {
    /// # Errors
    /// Returns [`HostIoError`] if the underlying source fails or is
    /// exhausted.
    fn read_line(&mut self) -> Result<String, HostIoError>;
}

/// Reads a line from the process's real stdin.
#[derive(Debug, Default)]
pub struct StdInput;

impl InputReader for StdInput {
    fn read_line(&mut self) -> Result<String, HostIoError> {
        let mut buf = String::new();
        std::io::stdin()
            .read_line(&mut buf)
            .map_err(|e| HostIoError::new(e.to_string()))?;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(buf)
    }
}

/// Feeds pre-scripted lines, in order, for deterministic tests.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputReader for ScriptedInput {
    fn read_line(&mut self) -> Result<String, HostIoError> {
        Ok(self.lines.pop_front().unwrap_or_default())
    }
}
