use crate::results::convert_to_value;
use async_trait::async_trait;
use sqlbatch_driver::Error::ExecutionError;
use sqlbatch_driver::{
    BackendKind, CommandOutcome, ConnectionError, DuckDbConfig, Result, ResultSet,
};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Open the DuckDB database described by the configuration.
///
/// # Errors
/// * [`ConnectionError::NotFound`] if the file does not exist and creation was not requested
/// * [`ConnectionError::Driver`] if DuckDB fails to open the file
#[expect(clippy::unused_async)]
pub async fn connect(config: &DuckDbConfig) -> Result<Connection> {
    Connection::open(config)
}

#[derive(Debug)]
pub struct Connection {
    target: String,
    connection: Mutex<Option<duckdb::Connection>>,
}

impl Connection {
    fn open(config: &DuckDbConfig) -> Result<Connection> {
        let path = &config.path;
        if !config.create && !path.exists() {
            return Err(ConnectionError::NotFound(path.clone()).into());
        }

        debug!("opening duckdb database {}", path.display());
        let connection = duckdb::Connection::open(path)
            .map_err(|error| ConnectionError::Driver(error.to_string()))?;

        Ok(Connection {
            target: path.display().to_string(),
            connection: Mutex::new(Some(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<duckdb::Connection>>> {
        self.connection
            .lock()
            .map_err(|error| ConnectionError::Driver(error.to_string()).into())
    }
}

fn closed() -> sqlbatch_driver::Error {
    ConnectionError::Driver("connection is closed".to_string()).into()
}

#[async_trait]
impl sqlbatch_driver::Connection for Connection {
    fn backend(&self) -> BackendKind {
        BackendKind::DuckDb
    }

    fn target(&self) -> &String {
        &self.target
    }

    async fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let guard = self.lock()?;
        let connection = guard.as_ref().ok_or_else(closed)?;

        let mut statement = connection
            .prepare(sql)
            .map_err(|error| ExecutionError(error.to_string()))?;
        let mut query_rows = statement
            .query([])
            .map_err(|error| ExecutionError(error.to_string()))?;
        let columns = query_rows
            .as_ref()
            .map(duckdb::Statement::column_names)
            .unwrap_or_default();

        let mut rows = Vec::new();
        while let Some(query_row) = query_rows
            .next()
            .map_err(|error| ExecutionError(error.to_string()))?
        {
            let mut row = Vec::with_capacity(columns.len());
            for (index, column_name) in columns.iter().enumerate() {
                row.push(convert_to_value(query_row, column_name, index)?);
            }
            rows.push(row);
        }

        Ok(ResultSet::new(columns, rows))
    }

    async fn execute(&mut self, sql: &str) -> Result<CommandOutcome> {
        let guard = self.lock()?;
        let connection = guard.as_ref().ok_or_else(closed)?;
        let rows = connection
            .execute(sql, [])
            .map_err(|error| ExecutionError(error.to_string()))?;
        Ok(CommandOutcome::new(Some(u64::try_from(rows)?)))
    }

    /// Statements are committed by DuckDB as they run.
    async fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let connection = self.lock()?.take();
        if let Some(connection) = connection {
            debug!("closing duckdb database {}", self.target);
            connection
                .close()
                .map_err(|(_, error)| ConnectionError::Driver(error.to_string()))?;
        }
        Ok(())
    }
}
