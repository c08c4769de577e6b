mod memory;
mod stderr;
mod stdout;
mod writer;

pub use memory::MemoryWriter;
pub use stderr::StderrWriter;
pub use stdout::StdoutWriter;
pub use writer::{Output, Writer};
