use crate::error::{Error, Result};
use sqlbatch_driver::{Connection, ConnectionConfig};
use sqlbatch_formatters::writers::Output;
use std::io::Write;
use tracing::info;

/// Open a session to the backend selected by the configuration and report the target on the
/// diagnostics output.
///
/// # Errors
/// Returns [`Error::ConnectionError`] if the session cannot be established
pub async fn connect(
    config: &ConnectionConfig,
    diagnostics: &mut Output,
) -> Result<Box<dyn Connection>> {
    let connection = open(config).await.map_err(Error::ConnectionError)?;

    let backend = connection.backend();
    let target = connection.target();
    info!("connected to {backend}: {target}");
    writeln!(diagnostics, "Connected to {backend}: {target}")?;
    Ok(connection)
}

async fn open(config: &ConnectionConfig) -> sqlbatch_driver::Result<Box<dyn Connection>> {
    match config {
        #[cfg(feature = "driver-duckdb")]
        ConnectionConfig::DuckDb(config) => {
            let connection = sqlbatch_driver_duckdb::connect(config).await?;
            Ok(Box::new(connection))
        }
        #[cfg(feature = "driver-sqlserver")]
        ConnectionConfig::SqlServer(config) => {
            let connection = sqlbatch_driver_sqlserver::connect(config).await?;
            Ok(Box::new(connection))
        }
        #[allow(unreachable_patterns)]
        config => Err(sqlbatch_driver::ConnectionError::Driver(format!(
            "{} support is not enabled in this build",
            config.backend()
        ))
        .into()),
    }
}
