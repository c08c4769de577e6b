#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod delimited;
mod error;
#[cfg(feature = "excel")]
mod excel;
mod footer;
mod formatter;
mod json;
mod plain;
#[cfg(feature = "table")]
mod table;
pub mod writers;

pub use error::{Error, Result};
pub use footer::{write_footer, write_outcome};
pub use formatter::{Formatter, FormatterManager, FormatterOptions, OutputFormat};
