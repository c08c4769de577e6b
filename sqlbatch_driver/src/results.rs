use crate::Value;
use indexmap::IndexMap;

/// A single row of a query result
pub type Row = Vec<Value>;

/// A fully materialized row set. Column order is the order reported by the
/// backend; the set is immutable once created.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as column name to value mappings, in column order.
    pub fn records(&self) -> impl Iterator<Item = IndexMap<&str, &Value>> {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
    }
}
