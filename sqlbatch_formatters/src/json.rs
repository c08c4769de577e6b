use crate::error::Result;
use crate::formatter::FormatterOptions;
use crate::writers::Output;
use serde_json::to_string_pretty;
use sqlbatch_driver::ResultSet;
use std::io::Write;

/// A formatter for JSON: an array of records, two space indentation
#[derive(Debug, Default)]
pub struct Formatter;

impl crate::Formatter for Formatter {
    fn identifier(&self) -> &'static str {
        "json"
    }

    fn format(
        &self,
        _options: &FormatterOptions,
        results: &ResultSet,
        output: &mut Output,
    ) -> Result<()> {
        let records: Vec<_> = results.records().collect();
        let json = to_string_pretty(&records)?;
        writeln!(output, "{json}")?;
        Ok(())
    }
}
