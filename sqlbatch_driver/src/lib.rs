//! # sqlbatch driver
//!
//! Interfaces shared by the sqlbatch backends: the connection configuration,
//! the [`Connection`] capability trait, and the value model used for result
//! sets.

#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod backend;
mod config;
mod connection;
mod error;
mod results;
mod value;

pub use backend::{BackendKind, StatementKind};
pub use config::{
    ConnectionConfig, Credentials, DEFAULT_SQLSERVER_DATABASE, DEFAULT_SQLSERVER_PORT, DuckDbConfig,
    Encryption, SqlServerConfig,
};
pub use connection::{CommandOutcome, Connection, MockConnection, Results};
pub use error::{ConnectionError, Error, Result};
pub use results::{ResultSet, Row};
pub use value::Value;
