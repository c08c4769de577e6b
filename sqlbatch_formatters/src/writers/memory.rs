use crate::writers::writer::Writer;
use std::fmt::Display;
use std::io::{Result, Write};

/// Buffers everything written; used for tests and for capturing output.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    buffer: Vec<u8>,
}

impl MemoryWriter {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

impl Display for MemoryWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.buffer))
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.buffer.flush()
    }
}

impl Writer for MemoryWriter {}
