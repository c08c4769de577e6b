use std::fmt;

/// The kind of database backend a connection targets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BackendKind {
    /// Local, file backed analytical database (DuckDB)
    DuckDb,
    /// Remote database server (SQL Server)
    SqlServer,
}

impl BackendKind {
    /// Whether command statements must be committed explicitly after they run.
    /// The embedded backend commits each statement on its own.
    #[must_use]
    pub fn requires_explicit_commit(self) -> bool {
        matches!(self, BackendKind::SqlServer)
    }

    /// The batch terminator keyword used by the backend's scripting convention, if any.
    #[must_use]
    pub fn batch_terminator(self) -> Option<&'static str> {
        match self {
            BackendKind::DuckDb => None,
            BackendKind::SqlServer => Some("GO"),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::DuckDb => write!(f, "DuckDB"),
            BackendKind::SqlServer => write!(f, "SQL Server"),
        }
    }
}

/// Whether a statement produces a row set or only has effects.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatementKind {
    RowReturning,
    Command,
}

impl StatementKind {
    #[must_use]
    pub fn is_row_returning(self) -> bool {
        matches!(self, StatementKind::RowReturning)
    }
}
