use crate::error::Result;
use crate::{BackendKind, ResultSet, StatementKind};
use async_trait::async_trait;
use mockall::automock;
use std::fmt::Debug;

/// Acknowledgment of a command statement.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommandOutcome {
    /// Affected row count; absent when the backend does not report one
    pub rows_affected: Option<u64>,
}

impl CommandOutcome {
    #[must_use]
    pub fn new(rows_affected: Option<u64>) -> Self {
        Self { rows_affected }
    }
}

/// What running a single statement produced
#[derive(Clone, Debug, PartialEq)]
pub enum Results {
    Query(ResultSet),
    Execute(CommandOutcome),
}

/// An open session to exactly one backend.
#[automock]
#[async_trait]
pub trait Connection: Debug + Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Target description for diagnostics; never includes secrets
    fn target(&self) -> &String;

    async fn query(&mut self, sql: &str) -> Result<ResultSet>;

    async fn execute(&mut self, sql: &str) -> Result<CommandOutcome>;

    /// Commit the effects of the preceding statements
    async fn commit(&mut self) -> Result<()>;

    async fn close(&mut self) -> Result<()>;

    /// Run a statement as a query or a command according to its kind.
    async fn run(&mut self, sql: &str, kind: StatementKind) -> Result<Results> {
        match kind {
            StatementKind::RowReturning => Ok(Results::Query(self.query(sql).await?)),
            StatementKind::Command => Ok(Results::Execute(self.execute(sql).await?)),
        }
    }
}
