use crate::args::ConfigError;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or contradictory arguments; the batch never starts
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// The backend session could not be established or released
    #[error(transparent)]
    ConnectionError(sqlbatch_driver::Error),
    /// A statement failed; later statements were not run
    #[error("statement {index} failed: {source}")]
    ExecutionError {
        index: usize,
        source: sqlbatch_driver::Error,
    },
    /// Format error
    #[error(transparent)]
    FormatError(#[from] sqlbatch_formatters::Error),
    /// IO error
    #[error(transparent)]
    IoError(anyhow::Error),
}

/// Converts a [`sqlbatch_driver::ConnectionError`] into a
/// [`ConnectionError`](Error::ConnectionError)
impl From<sqlbatch_driver::ConnectionError> for Error {
    fn from(error: sqlbatch_driver::ConnectionError) -> Self {
        Error::ConnectionError(error.into())
    }
}

/// Converts a [`std::io::Error`] into an [`IoError`](Error::IoError)
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlbatch_driver::ConnectionError;

    #[test]
    fn test_connection_error() {
        let error = Error::from(ConnectionError::Network("timed out".to_string()));
        assert!(matches!(error, Error::ConnectionError(_)));
        assert_eq!(error.to_string(), "network error: timed out");
    }

    #[test]
    fn test_execution_error() {
        let error = Error::ExecutionError {
            index: 3,
            source: sqlbatch_driver::Error::ExecutionError("syntax error".to_string()),
        };
        assert_eq!(error.to_string(), "statement 3 failed: syntax error");
    }

    #[test]
    fn test_config_error() {
        let error = Error::from(ConfigError::ConflictingBackends);
        assert!(matches!(error, Error::ConfigError(_)));
    }

    #[test]
    fn test_std_io_error() {
        let error = std::io::Error::other("test");
        let io_error = Error::from(error);

        assert_eq!(io_error.to_string(), "test");
    }
}
