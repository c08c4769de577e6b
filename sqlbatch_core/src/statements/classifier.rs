use sqlbatch_driver::{BackendKind, StatementKind};

const DUCKDB_ROW_RETURNING: &[&str] = &[
    "SELECT",
    "WITH",
    "SHOW",
    "DESCRIBE",
    "PRAGMA",
    "FROM",
    "SUMMARIZE",
    "EXPLAIN",
];

const SQLSERVER_ROW_RETURNING: &[&str] = &["SELECT", "WITH", "SHOW", "EXEC", "EXECUTE", "SP_"];

/// Decide from its leading keyword whether a statement returns rows.
///
/// This is a prefix test on the upper cased, trimmed text, not a parse; a statement is never
/// executed to classify it.
#[must_use]
pub fn classify(sql: &str, backend: BackendKind) -> StatementKind {
    let keywords = match backend {
        BackendKind::DuckDb => DUCKDB_ROW_RETURNING,
        BackendKind::SqlServer => SQLSERVER_ROW_RETURNING,
    };
    let sql = sql.trim().to_uppercase();

    if keywords.iter().any(|keyword| sql.starts_with(keyword)) {
        StatementKind::RowReturning
    } else {
        StatementKind::Command
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        for backend in [BackendKind::DuckDb, BackendKind::SqlServer] {
            for sql in ["select 1", "SELECT 1", "  SELECT 1  ", "\n\tSeLeCt 1"] {
                assert_eq!(classify(sql, backend), StatementKind::RowReturning);
            }
        }
    }

    #[test]
    fn test_duckdb() {
        for sql in [
            "WITH t AS (SELECT 1) SELECT * FROM t",
            "SHOW TABLES",
            "DESCRIBE t",
            "PRAGMA table_info('t')",
            "FROM t",
            "SUMMARIZE t",
            "EXPLAIN SELECT 1",
        ] {
            assert_eq!(classify(sql, BackendKind::DuckDb), StatementKind::RowReturning);
        }
        for sql in ["EXEC sp_who", "CREATE TABLE t(id INT)", "INSERT INTO t VALUES (1)"] {
            assert_eq!(classify(sql, BackendKind::DuckDb), StatementKind::Command);
        }
    }

    #[test]
    fn test_sqlserver() {
        for sql in [
            "EXEC sp_who",
            "execute dbo.report",
            "sp_help",
            "WITH t AS (SELECT 1) SELECT * FROM t",
        ] {
            assert_eq!(classify(sql, BackendKind::SqlServer), StatementKind::RowReturning);
        }
        for sql in ["DESCRIBE t", "PRAGMA x", "UPDATE t SET id = 1", "DROP TABLE IF EXISTS t"] {
            assert_eq!(classify(sql, BackendKind::SqlServer), StatementKind::Command);
        }
    }

    #[test]
    fn test_prefix_heuristic() {
        // Only the leading keyword is inspected
        assert_eq!(
            classify("INSERT INTO t SELECT * FROM s", BackendKind::DuckDb),
            StatementKind::Command
        );
        assert_eq!(
            classify("SELECTED_ROWS", BackendKind::DuckDb),
            StatementKind::RowReturning
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(classify("", BackendKind::DuckDb), StatementKind::Command);
    }
}
