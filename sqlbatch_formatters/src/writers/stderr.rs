use crate::writers::writer::Writer;
use std::fmt::Display;
use std::io::{Result, Write, stderr};

/// Diagnostics, progress and row count summaries
#[derive(Debug, Default)]
pub struct StderrWriter;

impl Display for StderrWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stderr")
    }
}

impl Write for StderrWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        stderr().write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        stderr().flush()
    }
}

impl Writer for StderrWriter {}
