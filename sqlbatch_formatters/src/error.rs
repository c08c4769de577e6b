pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error(transparent)]
    IoError(anyhow::Error),
    /// Error when an unknown format is specified
    #[error("unknown format [{format}]")]
    UnknownFormat { format: String },
    /// The format is known but its formatter is not part of this build
    #[error("format [{format}] is not available")]
    UnavailableFormat { format: String },
}

/// Converts a [`csv::Error`] into an [`IoError`](Error::IoError)
impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::IoError(error.into())
    }
}

/// Converts a [`serde_json::Error`] into an [`IoError`](Error::IoError)
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::IoError(error.into())
    }
}

#[cfg(feature = "excel")]
/// Converts a [`rust_xlsxwriter::XlsxError`] into an [`IoError`](Error::IoError)
impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Error::IoError(error.into())
    }
}

/// Converts a [`std::io::Error`] into an [`IoError`](Error::IoError)
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error.into())
    }
}

/// Converts a [`std::num::TryFromIntError`] into an [`IoError`](Error::IoError)
impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Self {
        Error::IoError(error.into())
    }
}
