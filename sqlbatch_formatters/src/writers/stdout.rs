use crate::writers::writer::Writer;
use std::fmt::Display;
use std::io::{Result, Write, stdout};

/// Rendered result data
#[derive(Debug, Default)]
pub struct StdoutWriter;

impl Display for StdoutWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stdout")
    }
}

impl Write for StdoutWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        stdout().write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        stdout().flush()
    }
}

impl Writer for StdoutWriter {}
