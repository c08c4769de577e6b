#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]

mod driver;
mod results;

pub use driver::{Connection, connect};
