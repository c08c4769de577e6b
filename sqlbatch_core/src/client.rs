use crate::args::ClientArgs;
use crate::configuration::Configuration;
use crate::connection::connect;
use crate::error::{Error, Result};
use crate::executors::BatchExecutor;
use crate::statements::split;
use sqlbatch_formatters::FormatterManager;
use sqlbatch_formatters::writers::Output;
use tracing::{info, warn};

/// Validate the arguments, connect, and run the whole batch. The connection is closed on
/// every path once it has been opened; a statement failure takes precedence over a failure
/// to close.
///
/// # Errors
/// * [`Error::ConfigError`] if the arguments are invalid; nothing is connected
/// * [`Error::ConnectionError`] if the backend cannot be reached or released
/// * [`Error::ExecutionError`] for the first failing statement
pub async fn execute(
    configuration: &Configuration,
    args: &ClientArgs,
    output: &mut Output,
    diagnostics: &mut Output,
) -> Result<()> {
    let request = args.validate()?;
    let backend = request.connection.backend();
    let statements = split(&request.script, backend);
    info!(
        "running {} statement(s) against {backend} with {} output",
        statements.len(),
        request.format
    );

    let mut connection = connect(&request.connection, diagnostics).await?;
    let formatter_manager = FormatterManager::default();
    let result = BatchExecutor::new(
        configuration,
        &formatter_manager,
        request.format,
        connection.as_mut(),
        output,
        diagnostics,
    )
    .execute(&statements)
    .await;

    let closed = connection.close().await;
    if let Err(error) = &closed {
        warn!("failed to close connection: {error}");
    }

    result?;
    closed.map_err(Error::ConnectionError)?;
    info!("batch completed");
    Ok(())
}
