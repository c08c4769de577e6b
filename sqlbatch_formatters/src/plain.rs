use crate::error::Result;
use crate::writers::Output;
use sqlbatch_driver::ResultSet;
use std::io::Write;

const SEPARATOR: &str = "|";

/// Unaligned listing: a header line, then one line per row, fields joined by `|`.
/// Used when the requested formatter is not available.
pub(crate) fn format(results: &ResultSet, output: &mut Output) -> Result<()> {
    writeln!(output, "{}", results.columns().join(SEPARATOR))?;
    for row in results.rows() {
        let line = row
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        writeln!(output, "{line}")?;
    }
    Ok(())
}
