//! # sqlbatch core
//!
//! Runs a SQL script against a DuckDB file or a SQL Server instance: the script is split into
//! statements, each statement is classified and executed in order, and returned rows are
//! rendered in the requested output format. The first failing statement ends the batch.

#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod client;
pub mod configuration;
pub mod connection;
mod error;
pub mod executors;
pub mod statements;

pub use error::{Error, Result};
