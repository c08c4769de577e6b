use std::path::PathBuf;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures while establishing or holding a backend session
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The database file does not exist and creation was not requested
    #[error("database file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The server rejected the supplied credentials
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The host is unreachable or the connection timed out
    #[error("network error: {0}")]
    Network(String),
    /// Any other failure reported by the backend library
    #[error("{0}")]
    Driver(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ConnectionError(#[from] ConnectionError),
    /// Backend reported failure while running a statement
    #[error("{0}")]
    ExecutionError(String),
    /// Data type conversion error
    #[error("{0}")]
    ConversionError(String),
    /// IO error
    #[error("{0}")]
    IoError(String),
    /// Error when parsing an integer
    #[error(transparent)]
    TryFromIntError(#[from] std::num::TryFromIntError),
    /// Error when a column type is not supported
    #[error("column type [{column_type}] is not supported for column [{column_name}]")]
    UnsupportedColumnType {
        column_name: String,
        column_type: String,
    },
}

/// Converts a [`jiff::Error`] into an [`ConversionError`](Error::ConversionError)
impl From<jiff::Error> for Error {
    fn from(error: jiff::Error) -> Self {
        Error::ConversionError(error.to_string())
    }
}

/// Converts a [`std::io::Error`] into an [`IoError`](Error::IoError)
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error.to_string())
    }
}

/// Convert [`utf8 errors`](std::string::FromUtf8Error) to
/// [`ConversionError`](Error::ConversionError)
impl From<std::string::FromUtf8Error> for Error {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Error::ConversionError(error.to_string())
    }
}
