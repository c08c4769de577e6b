use crate::BackendKind;
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default TCP port of a SQL Server instance
pub const DEFAULT_SQLSERVER_PORT: u16 = 1433;
/// Default database selected on a SQL Server connection
pub const DEFAULT_SQLSERVER_DATABASE: &str = "master";

/// Validated connection settings for exactly one backend. Built once at startup
/// and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionConfig {
    DuckDb(DuckDbConfig),
    SqlServer(SqlServerConfig),
}

impl ConnectionConfig {
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            ConnectionConfig::DuckDb(_) => BackendKind::DuckDb,
            ConnectionConfig::SqlServer(_) => BackendKind::SqlServer,
        }
    }
}

/// Settings for a local, file backed DuckDB database.
#[derive(Clone, Debug, PartialEq)]
pub struct DuckDbConfig {
    pub path: PathBuf,
    /// Create the database file when it does not exist
    pub create: bool,
}

impl DuckDbConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            create: false,
        }
    }

    #[must_use]
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }
}

/// Settings for a remote SQL Server instance.
#[derive(Clone, Debug, PartialEq)]
pub struct SqlServerConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub credentials: Credentials,
    pub trust_server_certificate: bool,
    pub encryption: Encryption,
}

impl SqlServerConfig {
    pub fn new<S: Into<String>>(host: S, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SQLSERVER_PORT,
            database: DEFAULT_SQLSERVER_DATABASE.to_string(),
            credentials,
            trust_server_certificate: false,
            encryption: Encryption::default(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = database.into();
        self
    }

    #[must_use]
    pub fn with_trust_server_certificate(mut self, trust_server_certificate: bool) -> Self {
        self.trust_server_certificate = trust_server_certificate;
        self
    }

    #[must_use]
    pub fn with_encryption(mut self, encryption: Encryption) -> Self {
        self.encryption = encryption;
        self
    }

    /// Human readable target used in diagnostics; never includes the password.
    #[must_use]
    pub fn target(&self) -> String {
        format!(
            "{}:{}/{} [{}]",
            self.host, self.port, self.database, self.credentials
        )
    }
}

/// How a SQL Server session authenticates.
#[derive(Clone, PartialEq)]
pub enum Credentials {
    Password { username: String, password: String },
    /// The ambient operating system identity
    Integrated,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"********")
                .finish(),
            Credentials::Integrated => write!(f, "Integrated"),
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => write!(f, "SQL auth ({username})"),
            Credentials::Integrated => write!(f, "Integrated auth"),
        }
    }
}

/// TLS negotiation policy for SQL Server connections.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Encryption {
    Off,
    On,
    NotSupported,
    #[default]
    Required,
}

impl FromStr for Encryption {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "off" => Ok(Encryption::Off),
            "on" => Ok(Encryption::On),
            "not-supported" | "not_supported" => Ok(Encryption::NotSupported),
            "required" => Ok(Encryption::Required),
            _ => Err(Error::ConversionError(format!(
                "invalid encryption level: {value}"
            ))),
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Encryption::Off => "off",
            Encryption::On => "on",
            Encryption::NotSupported => "not-supported",
            Encryption::Required => "required",
        };
        write!(f, "{value}")
    }
}
