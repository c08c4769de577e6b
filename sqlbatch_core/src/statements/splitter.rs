use crate::statements::Statement;
use sqlbatch_driver::BackendKind;

/// Split a script into statements, in their original order.
///
/// Backends with a batch terminator (`GO` for SQL Server) split on lines holding only the
/// terminator whenever it appears anywhere in the script, in any case. Everything else
/// splits on `;`. Blank fragments are dropped. The split is lexical: separators inside
/// string literals or comments still end a statement.
#[must_use]
pub fn split(script: &str, backend: BackendKind) -> Vec<Statement> {
    match backend.batch_terminator() {
        Some(terminator) if script.to_uppercase().contains(terminator) => {
            split_batches(script, terminator)
                .iter()
                .filter_map(|batch| Statement::new(batch))
                .collect()
        }
        _ => script.split(';').filter_map(Statement::new).collect(),
    }
}

fn split_batches(script: &str, terminator: &str) -> Vec<String> {
    let mut batches = Vec::new();
    let mut batch = String::new();

    for line in script.lines() {
        if line.trim().eq_ignore_ascii_case(terminator) {
            batches.push(std::mem::take(&mut batch));
        } else {
            batch.push_str(line);
            batch.push('\n');
        }
    }
    batches.push(batch);
    batches
}
