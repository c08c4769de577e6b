use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::statements::{Statement, classify};
use sqlbatch_driver::{Connection, Results};
use sqlbatch_formatters::writers::Output;
use sqlbatch_formatters::{FormatterManager, OutputFormat, write_outcome};
use std::fmt;
use std::fmt::Debug;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Runs the statements of a batch in order against a single connection. Rendered row sets go
/// to `output`; progress, row counts and command outcomes go to `diagnostics`.
pub struct BatchExecutor<'a> {
    configuration: &'a Configuration,
    formatter_manager: &'a FormatterManager,
    format: OutputFormat,
    connection: &'a mut dyn Connection,
    output: &'a mut Output,
    diagnostics: &'a mut Output,
}

impl<'a> BatchExecutor<'a> {
    #[must_use]
    pub fn new(
        configuration: &'a Configuration,
        formatter_manager: &'a FormatterManager,
        format: OutputFormat,
        connection: &'a mut dyn Connection,
        output: &'a mut Output,
        diagnostics: &'a mut Output,
    ) -> BatchExecutor<'a> {
        Self {
            configuration,
            formatter_manager,
            format,
            connection,
            output,
            diagnostics,
        }
    }

    /// Execute the statements in order, stopping at the first failure. Statements that ran
    /// before the failure keep their effects.
    ///
    /// # Errors
    /// Returns [`Error::ExecutionError`] with the 1-based position of the failing statement,
    /// or an error if the results cannot be written
    pub async fn execute(&mut self, statements: &[Statement]) -> Result<()> {
        let mut rendered = false;

        for (index, statement) in statements.iter().enumerate() {
            let index = index + 1;
            let preview = statement.preview(self.configuration.preview_length);
            writeln!(self.diagnostics, "Executing: {preview}")?;

            let (results, elapsed) = self
                .execute_statement(statement)
                .await
                .map_err(|source| Error::ExecutionError { index, source })?;

            let mut options = self.configuration.get_formatter_options();
            options.elapsed = elapsed;
            match results {
                Results::Query(result_set) => {
                    if rendered {
                        writeln!(self.output)?;
                    }
                    self.formatter_manager.render(
                        self.format,
                        &options,
                        &result_set,
                        self.output,
                        self.diagnostics,
                    )?;
                    rendered = true;
                }
                Results::Execute(outcome) => {
                    write_outcome(&options, &outcome, self.diagnostics)?;
                }
            }
        }

        Ok(())
    }

    /// Classify and run one statement, committing commands on backends that need it.
    #[instrument(skip(self, statement))]
    async fn execute_statement(
        &mut self,
        statement: &Statement,
    ) -> sqlbatch_driver::Result<(Results, Duration)> {
        let backend = self.connection.backend();
        let kind = classify(statement.as_str(), backend);
        debug!("executing {kind:?} statement: {statement}");

        let start = Instant::now();
        let results = self.connection.run(statement.as_str(), kind).await?;
        if !kind.is_row_returning() && backend.requires_explicit_commit() {
            self.connection.commit().await?;
        }

        Ok((results, start.elapsed()))
    }
}

impl Debug for BatchExecutor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("configuration", &self.configuration)
            .field("formatter_manager", &self.formatter_manager)
            .field("format", &self.format)
            .field("connection", &self.connection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::split;
    use indoc::indoc;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use sqlbatch_driver::{
        BackendKind, CommandOutcome, MockConnection, ResultSet, StatementKind, Value,
    };

    fn configuration() -> Configuration {
        Configuration {
            results_timer: false,
            ..Default::default()
        }
    }

    fn result_set(value: i64) -> ResultSet {
        ResultSet::new(vec!["x".to_string()], vec![vec![Value::I64(value)]])
    }

    fn statements(script: &str) -> Vec<Statement> {
        split(script, BackendKind::DuckDb)
    }

    #[test]
    fn test_debug() {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Csv,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        let debug = format!("{executor:?}");
        assert!(debug.contains("BatchExecutor"));
        assert!(debug.contains("configuration"));
        assert!(debug.contains("formatter_manager"));
        assert!(debug.contains("connection"));
    }

    #[tokio::test]
    async fn test_execute_queries() -> anyhow::Result<()> {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::DuckDb);
        connection
            .expect_run()
            .withf(|sql, kind| sql == "SELECT 1 AS x" && *kind == StatementKind::RowReturning)
            .times(1)
            .returning(|_, _| Ok(Results::Query(result_set(1))));
        connection
            .expect_run()
            .withf(|sql, kind| sql == "SELECT 2 AS x" && *kind == StatementKind::RowReturning)
            .times(1)
            .returning(|_, _| Ok(Results::Query(result_set(2))));
        connection.expect_commit().never();
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Csv,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        executor
            .execute(&statements("SELECT 1 AS x; SELECT 2 AS x"))
            .await?;

        assert_eq!(output.to_string().replace("\r\n", "\n"), "x\n1\n\nx\n2\n");
        assert_eq!(
            diagnostics.to_string(),
            indoc! {"
                Executing: SELECT 1 AS x
                1 row
                Executing: SELECT 2 AS x
                1 row
            "}
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_commands_duckdb() -> anyhow::Result<()> {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::DuckDb);
        connection
            .expect_run()
            .withf(|_, kind| *kind == StatementKind::Command)
            .times(2)
            .returning(|sql, _| {
                let rows = if sql.starts_with("INSERT") { Some(3) } else { None };
                Ok(Results::Execute(CommandOutcome::new(rows)))
            });
        connection.expect_commit().never();
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Table,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        executor
            .execute(&statements(
                "CREATE TABLE t(id INT); INSERT INTO t VALUES (1), (2), (3)",
            ))
            .await?;

        assert!(output.to_string().is_empty());
        assert_eq!(
            diagnostics.to_string(),
            indoc! {"
                Executing: CREATE TABLE t(id INT)
                Command executed
                Executing: INSERT INTO t VALUES (1), (2), (3)
                3 rows affected
            "}
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_commits_sqlserver_commands() -> anyhow::Result<()> {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut sequence = Sequence::new();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::SqlServer);
        connection
            .expect_run()
            .with(eq("UPDATE t SET id = 2"), eq(StatementKind::Command))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(Results::Execute(CommandOutcome::new(Some(1)))));
        connection
            .expect_commit()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| Ok(()));
        connection
            .expect_run()
            .with(eq("SELECT id FROM t"), eq(StatementKind::RowReturning))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(Results::Query(result_set(2))));
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Csv,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        let statements = split("UPDATE t SET id = 2\nGO\nSELECT id FROM t", BackendKind::SqlServer);
        executor.execute(&statements).await?;

        assert_eq!(output.to_string().replace("\r\n", "\n"), "x\n2\n");
        assert!(diagnostics.to_string().contains("1 row affected\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_aborts_on_first_error() -> anyhow::Result<()> {
        let script = "INSERT INTO t VALUES (1); SELEC 1; INSERT INTO t VALUES (2); SELECT 3";
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut sequence = Sequence::new();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::DuckDb);
        connection
            .expect_run()
            .with(eq("INSERT INTO t VALUES (1)"), eq(StatementKind::Command))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(Results::Execute(CommandOutcome::new(Some(1)))));
        connection
            .expect_run()
            .with(eq("SELEC 1"), eq(StatementKind::Command))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| {
                Err(sqlbatch_driver::Error::ExecutionError(
                    "syntax error at or near \"SELEC\"".to_string(),
                ))
            });
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Table,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        let result = executor.execute(&statements(script)).await;

        let Err(Error::ExecutionError { index, source }) = result else {
            panic!("expected an execution error");
        };
        assert_eq!(index, 2);
        assert!(source.to_string().contains("SELEC"));
        assert!(output.to_string().is_empty());
        assert!(!diagnostics.to_string().contains("VALUES (2)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_commit_failure_aborts() -> anyhow::Result<()> {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::SqlServer);
        connection
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(Results::Execute(CommandOutcome::default())));
        connection.expect_commit().times(1).returning(|| {
            Err(sqlbatch_driver::Error::ExecutionError(
                "transaction log full".to_string(),
            ))
        });
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Table,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        let statements = split("DELETE FROM t; DELETE FROM s", BackendKind::SqlServer);
        let result = executor.execute(&statements).await;

        assert!(matches!(result, Err(Error::ExecutionError { index: 1, .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_empty_result_set() -> anyhow::Result<()> {
        let configuration = configuration();
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::DuckDb);
        connection.expect_run().times(1).returning(|_, _| {
            Ok(Results::Query(ResultSet::new(vec!["x".to_string()], vec![])))
        });
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Json,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        executor.execute(&statements("SELECT 1 WHERE false")).await?;

        assert_eq!(output.to_string(), "(0 rows)\n");
        assert_eq!(diagnostics.to_string(), "Executing: SELECT 1 WHERE false\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_preview_length() -> anyhow::Result<()> {
        let configuration = Configuration {
            preview_length: 10,
            ..configuration()
        };
        let formatter_manager = FormatterManager::default();
        let mut connection = MockConnection::new();
        connection
            .expect_backend()
            .return_const(BackendKind::DuckDb);
        connection
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(Results::Execute(CommandOutcome::new(Some(0)))));
        let mut output = Output::default();
        let mut diagnostics = Output::default();

        let mut executor = BatchExecutor::new(
            &configuration,
            &formatter_manager,
            OutputFormat::Table,
            &mut connection,
            &mut output,
            &mut diagnostics,
        );
        executor
            .execute(&statements("DELETE   FROM\n  provinces"))
            .await?;

        assert_eq!(
            diagnostics.to_string(),
            "Executing: DELETE FRO...\n0 rows affected\n"
        );
        Ok(())
    }
}
