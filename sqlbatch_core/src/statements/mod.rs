mod classifier;
mod splitter;
mod statement;

pub use classifier::classify;
pub use splitter::split;
pub use statement::Statement;
